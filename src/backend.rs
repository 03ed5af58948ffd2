//! Simulated companion backend.
//!
//! Stands in for the image-to-3D service and the high-five endpoint. Both
//! calls resolve after a fixed delay with canned data; nothing leaves the
//! process.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TimingConfig;
use crate::demo::drawing::Snapshot;
use crate::error::{DemoError, DemoResult};

/// Descriptor returned for every generated character.
pub const CHARACTER_DESCRIPTOR: &str = "Generated 3D Model";

/// Fixed reply to a high-five.
pub const HIGH_FIVE_REPLY: &str = "Nice job! I'm here with you! ✨";

/// Wire-shaped response of the generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub character_descriptor: String,
}

/// A character produced from a drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCharacter {
    pub descriptor: String,
    /// Dimensions of the drawing it was generated from.
    pub source_size: (u32, u32),
}

#[derive(Debug, Clone)]
pub struct MockBackend {
    generation_delay: Duration,
    high_five_delay: Duration,
    fail_generation: bool,
}

impl MockBackend {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            generation_delay: timing.generation_delay(),
            high_five_delay: timing.high_five_delay(),
            fail_generation: false,
        }
    }

    /// Make every generation call report failure.
    pub fn with_failing_generation(mut self, fail: bool) -> Self {
        self.fail_generation = fail;
        self
    }

    /// Turn a drawing snapshot into a character, after the generation delay.
    pub async fn generate_character(&self, snapshot: Snapshot) -> DemoResult<GeneratedCharacter> {
        tokio::time::sleep(self.generation_delay).await;
        let response = GenerationResponse {
            success: !self.fail_generation,
            character_descriptor: CHARACTER_DESCRIPTOR.to_string(),
        };
        if !response.success {
            warn!(target: "backend", "simulated generation failure");
            return Err(DemoError::GenerationFailed(
                "the character service did not respond".to_string(),
            ));
        }
        debug!(
            target: "backend",
            bytes = snapshot.png_bytes().len(),
            "character generated"
        );
        Ok(GeneratedCharacter {
            descriptor: response.character_descriptor,
            source_size: (snapshot.width(), snapshot.height()),
        })
    }

    /// Send a high-five and wait for the companion's answer.
    pub async fn send_high_five(&self) -> String {
        tokio::time::sleep(self.high_five_delay).await;
        HIGH_FIVE_REPLY.to_string()
    }
}
