//! `session.yaml`: remembers who is logged in across restarts.
//!
//! ```yaml
//! current_user_id: user-001
//! updated_at: "2024-11-01T10:00:00+00:00"
//! ```

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::FileConnection;
use crate::storage::traits::SessionStorage;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionFile {
    pub current_user_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl FileConnection {
    fn session_path(&self) -> PathBuf {
        self.base_directory().join("session.yaml")
    }

    fn load_session(&self) -> Result<SessionFile> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(SessionFile::default());
        }
        let yaml_content = fs::read_to_string(&path)?;
        let session: SessionFile = serde_yaml::from_str(&yaml_content)?;
        debug!("Loaded session from {:?}", path);
        Ok(session)
    }

    fn save_session(&self, current_user_id: Option<&str>) -> Result<()> {
        let session = SessionFile {
            current_user_id: current_user_id.map(str::to_string),
            updated_at: Some(Utc::now().to_rfc3339()),
        };
        let path = self.session_path();
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, serde_yaml::to_string(&session)?)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl SessionStorage for FileConnection {
    fn get_current_user_id(&self) -> Result<Option<String>> {
        Ok(self.load_session()?.current_user_id)
    }

    fn set_current_user_id(&self, user_id: &str) -> Result<()> {
        self.save_session(Some(user_id))?;
        info!("Session set to user '{}'", user_id);
        Ok(())
    }

    fn clear_current_user_id(&self) -> Result<()> {
        self.save_session(None)?;
        info!("Session cleared");
        Ok(())
    }
}
