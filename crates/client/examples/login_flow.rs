//! End-to-end walkthrough: log in, list projects, react to expiry.
//!
//! Point `POLICYDESK_API_URL` at a running backend, then:
//!
//! ```sh
//! POLICYDESK_USERNAME=jdoe POLICYDESK_PASSWORD=... cargo run --example login_flow
//! ```

use std::sync::Arc;

use policydesk_auth::{Section, can_access_section};
use policydesk_client::models::auth::LoginRequest;
use policydesk_client::{
    ApiClient, ClientConfig, FileTokenStore, ProjectsApi, SessionController, SessionEvent,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    policydesk_observability::init();

    let store = Arc::new(FileTokenStore::in_user_data_dir()?);
    let client = ApiClient::new(ClientConfig::from_env(), store);
    let controller = SessionController::new(client.clone());

    // The shell would route back to the login screen on this.
    let events = client.events().subscribe();

    let session = match controller.restore_from_storage() {
        Some(session) => {
            tracing::info!("restored previous session");
            session
        }
        None => {
            let request = LoginRequest {
                username: std::env::var("POLICYDESK_USERNAME")?,
                password: std::env::var("POLICYDESK_PASSWORD")?,
            };
            controller.login(&request).await?
        }
    };

    if let Some(role) = session.claims.as_ref().and_then(|c| c.role()) {
        let visible: Vec<_> = Section::ALL
            .iter()
            .filter(|s| can_access_section(role, **s))
            .map(Section::as_str)
            .collect();
        println!("{role} may see: {}", visible.join(", "));
    }

    let projects = ProjectsApi::new(client.clone()).list().await?;
    println!("{} project(s)", projects.len());
    for project in projects {
        println!("  #{} {}", project.id, project.name);
    }

    while let Ok(event) = events.try_recv() {
        if event == SessionEvent::SessionExpired {
            println!("session expired; please log in again");
        }
    }

    Ok(())
}
