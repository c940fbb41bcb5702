use crate::{config::Config, services::auth::AuthService};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub config: Config,
}

impl AppState {
    pub fn new(auth: AuthService, config: Config) -> Self {
        Self { auth, config }
    }
}
