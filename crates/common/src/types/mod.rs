use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Plain-text banner served at `/`.
pub const WELCOME: &str = "Restaurant API - Welcome to the API Server";
