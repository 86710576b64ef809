// Admin session: who is making changes. The id ends up in the
// `CreatedByAdminId` field of every product the form submits. It is
// persisted in the home directory so the user only identifies once.

use anyhow::{Context, Result};
use std::path::PathBuf;

const SESSION_FILE: &str = ".catalog_admin_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    admin_id: u32,
}

impl AdminSession {
    pub fn new(admin_id: u32) -> Self {
        AdminSession { admin_id }
    }

    pub fn admin_id(&self) -> u32 {
        self.admin_id
    }

    /// Load the persisted session, if any.
    pub fn load() -> Result<Option<Self>> {
        let path = session_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let admin_id = data
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Corrupt session file {}", path.display()))?;
        Ok(Some(AdminSession { admin_id }))
    }

    /// Persist the session into a file in the user's home directory.
    pub fn persist(&self) -> Result<()> {
        let path = session_path();
        std::fs::write(&path, self.admin_id.to_string())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

fn session_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(SESSION_FILE)
}
