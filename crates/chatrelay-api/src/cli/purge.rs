//! `relay purge`: delete expired sessions.

use std::path::Path;

use anyhow::Result;

use chatrelay_core::store::session_store::SessionStore;
use chatrelay_types::config::{RelayConfig, StoreKind};

use crate::state::open_store;

pub async fn purge(config: &RelayConfig, data_dir: &Path) -> Result<()> {
    if config.store.kind == StoreKind::Memory {
        println!("Memory store holds no persisted sessions; nothing to purge.");
        return Ok(());
    }

    let store = open_store(&config.store, data_dir).await?;
    let removed = store.purge_expired().await?;
    println!("Purged {removed} expired session(s).");
    Ok(())
}
