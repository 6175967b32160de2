// Application State Module

use super::config::Config;
use super::ws::WsRegistry;
use crate::logs::RequestLog;
use crate::session::SessionStore;
use crate::store::ConfigStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub store: ConfigStore,
    pub logs: RequestLog,
    pub sessions: SessionStore,
    pub ws_clients: WsRegistry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = ConfigStore::new(config.initial_fakes());
        let logs = RequestLog::open(&config.storage.log_file);
        Self {
            config,
            store,
            logs,
            sessions: SessionStore::new(),
            ws_clients: WsRegistry::new(),
        }
    }
}
