// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer configuration.
//!
//! One surface, [`SerializerConfig`], set programmatically through the
//! [`SerializerBuilder`](crate::SerializerBuilder) or loaded from YAML
//! (feature `config-loaders`, on by default):
//!
//! ```yaml
//! strategy: speed_optimized      # or size_optimized (default)
//! comparison: legacy_id_based    # checksum_based (default) | skip_comparison
//! max_depth: 256
//! debug_dump_path: /tmp/wirebind-classes.txt
//! ```

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default nesting limit of one call.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Object-graph encoding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config-loaders", serde(rename_all = "snake_case"))]
pub enum SerializationStrategy {
    /// No reference tracking; shared instances are re-encoded in full and
    /// cycles fail with `DepthExceeded`.
    SpeedOptimized,
    /// Each distinct instance is encoded once per call; later encounters
    /// write its reference id.
    #[default]
    SizeOptimized,
}

/// How a peer's class definitions are checked against the local ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config-loaders", serde(rename_all = "snake_case"))]
pub enum ComparisonStrategy {
    /// Property checksums must be byte-equal.
    #[default]
    ChecksumBased,
    /// Legacy structural ids must be equal.
    LegacyIdBased,
    /// Accept any remote container without comparing.
    SkipComparison,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config-loaders", serde(default, deny_unknown_fields))]
pub struct SerializerConfig {
    pub strategy: SerializationStrategy,
    pub comparison: ComparisonStrategy,
    /// Maximum marshaller nesting of one call.
    pub max_depth: usize,
    /// Where to write the active class-definition table, if anywhere.
    pub debug_dump_path: Option<PathBuf>,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            strategy: SerializationStrategy::default(),
            comparison: ComparisonStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            debug_dump_path: None,
        }
    }
}

impl SerializerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::InvalidConfig("max_depth must be > 0".into()));
        }
        Ok(())
    }

    /// Parse a YAML document; missing keys keep their defaults.
    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidConfig(format!("YAML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "config-loaders")]
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigFileNotFound(path.display().to_string()),
            _ => Error::InvalidConfig(format!("failed to read {}: {}", path.display(), e)),
        })?;
        Self::from_yaml_str(&content)
    }
}
