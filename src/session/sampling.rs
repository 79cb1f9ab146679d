//! Sampling parameters chosen in the sidebar

use super::SessionError;
use crate::llm::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const TEMPERATURE_STEP: f32 = 0.1;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const MAX_OUTPUT_LENGTH_RANGE: RangeInclusive<u32> = 100..=2000;
pub const MAX_OUTPUT_LENGTH_STEP: u32 = 100;
pub const DEFAULT_MAX_OUTPUT_LENGTH: u32 = 1000;

/// Temperature and output length for one chat handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_output_length: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_length: DEFAULT_MAX_OUTPUT_LENGTH,
        }
    }
}

impl SamplingConfig {
    /// Build a config, rejecting values outside the sidebar ranges
    pub fn new(temperature: f32, max_output_length: u32) -> Result<Self, SessionError> {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(SessionError::InvalidSampling(format!(
                "temperature must be between {} and {}, got {temperature}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            )));
        }
        if !MAX_OUTPUT_LENGTH_RANGE.contains(&max_output_length) {
            return Err(SessionError::InvalidSampling(format!(
                "max_output_length must be between {} and {}, got {max_output_length}",
                MAX_OUTPUT_LENGTH_RANGE.start(),
                MAX_OUTPUT_LENGTH_RANGE.end()
            )));
        }
        Ok(Self {
            temperature,
            max_output_length,
        })
    }
}

impl From<SamplingConfig> for GenerationConfig {
    fn from(sampling: SamplingConfig) -> Self {
        Self {
            temperature: sampling.temperature,
            max_output_tokens: sampling.max_output_length,
        }
    }
}

impl From<GenerationConfig> for SamplingConfig {
    fn from(generation: GenerationConfig) -> Self {
        Self {
            temperature: generation.temperature,
            max_output_length: generation.max_output_tokens,
        }
    }
}
