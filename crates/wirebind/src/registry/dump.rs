// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Human-readable dump of a class-definition container, for diagnosing
//! schema drift between peers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::ClassDefinitionContainer;

/// Write one line per definition: id, checksum, legacy id, canonical name.
pub(crate) fn write_dump(path: &Path, label: &str, container: &ClassDefinitionContainer) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    writeln!(file, "# {} ({} classes)", label, container.len())?;
    writeln!(
        file,
        "{:<18}  {:<32}  {:<20}  name",
        "id", "checksum", "legacy_id"
    )?;
    for def in container.iter() {
        let legacy = def
            .legacy_id()
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        writeln!(
            file,
            "{:#018x}  {}  {:<20}  {}",
            def.id(),
            def.checksum_hex(),
            legacy,
            def.canonical_name()
        )?;
    }
    file.flush()
}
