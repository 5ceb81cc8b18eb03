//! Thin command adapter over the full filesystem.
//!
//! Owns everything the allocator core refuses to care about: the
//! not-yet-initialized state, command parsing, and display formatting of
//! status lines, timestamps and the pool grid. The core only ever sees
//! well-formed calls; everything here consumes its read-only snapshots.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail, Result};
use inosim_api::error::FsError;
use inosim_api::fs::{BlockSupport, DefragSupport, FileSupport, FileSysSupport};
use inosim_api::types::{BlockOwner, DiskGeometry, Inode};

use super::defrag::DefragFS;

/// Blocks rendered per row of the pool grid.
const GRID_WIDTH: usize = 32;

/// One interactive session: an optional filesystem plus command dispatch.
#[derive(Debug, Default)]
pub struct Session {
    fs: Option<DefragFS>,
}

impl Session {
    /// A session with no filesystem yet; every command except `init` fails
    /// with `NotInitialized`.
    pub fn new() -> Session {
        Session { fs: None }
    }

    fn fs_mut(&mut self) -> Result<&mut DefragFS, FsError> {
        self.fs.as_mut().ok_or(FsError::NotInitialized)
    }

    /// Parse and run one command line, returning the status text to display.
    ///
    /// Commands: `init [blocks [block_size]]`, `create <name> <bytes>`,
    /// `delete <name>`, `defrag`, `ls`, `stat <name>`, `pool`.
    pub fn dispatch(&mut self, line: &str) -> Result<String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["init"] => self.cmd_init(DiskGeometry::default()),
            ["init", blocks] => self.cmd_init(DiskGeometry {
                total_blocks: parse_num(blocks, "block count")?,
                ..DiskGeometry::default()
            }),
            ["init", blocks, block_size] => self.cmd_init(DiskGeometry {
                total_blocks: parse_num(blocks, "block count")?,
                block_size: parse_num(block_size, "block size")?,
                ..DiskGeometry::default()
            }),
            ["create", name, size] => {
                let size_bytes = parse_num(size, "file size")?;
                let inode = self.fs_mut()?.create(name, size_bytes)?;
                let indirect = inode.all_blocks.len() as u64 - inode.data_block_count;
                Ok(format!(
                    "File '{}' created ({} bytes, {} data blocks + {} indirect blocks).",
                    inode.name, inode.size_bytes, inode.data_block_count, indirect
                ))
            }
            ["delete", name] => {
                self.fs_mut()?.delete(name)?;
                Ok(format!("File '{}' deleted.", name))
            }
            ["defrag"] => {
                let report = self.fs_mut()?.defragment();
                if report.blocks_moved > 0 {
                    Ok(format!(
                        "Defragmentation complete. Moved {} blocks across {} files.",
                        report.blocks_moved, report.files_moved
                    ))
                } else {
                    Ok("No fragmentation found. Disk is already optimized.".to_string())
                }
            }
            ["ls"] => {
                let files = self.fs_mut()?.list();
                if files.is_empty() {
                    return Ok("No files".to_string());
                }
                let rows: Vec<String> = files
                    .iter()
                    .map(|f| format!("{}  {} bytes", f.name, f.size_bytes))
                    .collect();
                Ok(rows.join("\n"))
            }
            ["stat", name] => {
                let fs = self.fs_mut()?;
                let inode = fs
                    .get(name)
                    .ok_or_else(|| FsError::FileNotFound(name.to_string()))?;
                Ok(format_inode(&inode))
            }
            ["pool"] => {
                let status = self.fs_mut()?.pool_status();
                let mut out = format!(
                    "{} of {} blocks free\n",
                    status.free_blocks, status.total_blocks
                );
                for (i, slot) in status.slots.iter().enumerate() {
                    out.push(match slot {
                        BlockOwner::Free => '.',
                        BlockOwner::Data(_) => '#',
                        BlockOwner::Indirect(_) => 'I',
                    });
                    if (i + 1) % GRID_WIDTH == 0 {
                        out.push('\n');
                    }
                }
                Ok(out.trim_end().to_string())
            }
            [] => bail!("empty command"),
            [cmd, ..] => bail!("unknown command '{}'", cmd),
        }
    }

    fn cmd_init(&mut self, geom: DiskGeometry) -> Result<String> {
        let fs = DefragFS::init(&geom)?;
        self.fs = Some(fs);
        Ok(format!(
            "File system initialized. {} blocks ({}KB) available.",
            geom.total_blocks,
            geom.total_blocks * geom.block_size / 1024
        ))
    }
}

fn parse_num(word: &str, what: &str) -> Result<u64> {
    word.parse::<u64>()
        .map_err(|_| anyhow!("{} must be a number, got '{}'", what, word))
}

fn format_time(t: SystemTime) -> String {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => format!("{}.{:03}", d.as_secs(), d.subsec_millis()),
        Err(_) => "<before epoch>".to_string(),
    }
}

fn format_inode(inode: &Inode) -> String {
    let mut out = format!("Showing inode {} for file '{}'\n", inode.inum, inode.name);
    out.push_str(&format!("Size: {} bytes\n", inode.size_bytes));
    out.push_str(&format!("Data Blocks: {}\n", inode.data_block_count));
    out.push_str(&format!("Total Blocks: {}\n", inode.all_blocks.len()));
    out.push_str(&format!("Created: {}\n", format_time(inode.created)));
    out.push_str(&format!("Modified: {}\n", format_time(inode.modified)));
    out.push_str(&format!("Accessed: {}\n", format_time(inode.accessed)));
    out.push_str(&format!(
        "Permissions: {}  Owner: {}  Group: {}\n",
        inode.mode, inode.owner, inode.group
    ));
    out.push_str(&format!("Direct blocks: {:?}\n", inode.direct_blocks));
    match inode.single_indirect {
        Some(ind) => out.push_str(&format!(
            "Single indirect block: {} (points to {:?})\n",
            ind, inode.indirect_data_blocks
        )),
        None => out.push_str("Single indirect block: Unused\n"),
    }
    out.push_str("Double indirect block: Unused\n");
    out.push_str("Triple indirect block: Unused");
    out
}
