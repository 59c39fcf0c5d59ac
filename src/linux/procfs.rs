//! Parsers for the `/proc/<pid>` files the Linux backend relies on

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::regions::{RegionInfo, RegionState, RegionType};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Kernel-provided mappings that behave like loaded images
const PSEUDO_IMAGES: [&str; 3] = ["[vdso]", "[vvar]", "[vsyscall]"];

/// One line of `/proc/<pid>/maps`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsEntry {
    pub start: usize,
    pub end: usize,
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    pub shared: bool,
    pub inode: u64,
    /// Path or pseudo name, empty for anonymous memory
    pub path: String,
}

impl MapsEntry {
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    pub fn is_file_backed(&self) -> bool {
        self.path.starts_with('/')
    }
}

pub fn proc_path(pid: ProcessId, file: &str) -> PathBuf {
    PathBuf::from(format!("/proc/{}/{}", pid, file))
}

/// Parses `start-end perms offset dev inode [path]`
pub fn parse_maps_line(line: &str) -> Option<MapsEntry> {
    let mut rest = line.trim_start();
    let mut fields = [""; 5];
    for field in fields.iter_mut() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        *field = &rest[..end];
        rest = rest[end..].trim_start();
    }
    let [range, perms, _offset, _dev, inode] = fields;

    let (start, end) = range.split_once('-')?;
    let start = usize::from_str_radix(start, 16).ok()?;
    let end = usize::from_str_radix(end, 16).ok()?;
    if end <= start {
        return None;
    }

    let perms = perms.as_bytes();
    if perms.len() != 4 {
        return None;
    }

    Some(MapsEntry {
        start,
        end,
        readable: perms[0] == b'r',
        writable: perms[1] == b'w',
        executable: perms[2] == b'x',
        shared: perms[3] == b's',
        inode: inode.parse().ok()?,
        path: rest.trim_end().to_string(),
    })
}

/// Parses a whole maps file, skipping malformed lines
pub fn parse_maps(contents: &str) -> Vec<MapsEntry> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let entry = parse_maps_line(line);
            if entry.is_none() {
                warn!("Skipping malformed maps line: {:?}", line);
            }
            entry
        })
        .collect()
}

/// Maps procfs entries onto the committed/reserved and private/mapped/image model
pub fn classify(entries: &[MapsEntry]) -> Vec<RegionInfo> {
    let executable_files: HashSet<&str> = entries
        .iter()
        .filter(|e| e.executable && e.is_file_backed())
        .map(|e| e.path.as_str())
        .collect();

    entries
        .iter()
        .map(|entry| {
            let region_type = if PSEUDO_IMAGES.contains(&entry.path.as_str())
                || executable_files.contains(entry.path.as_str())
            {
                RegionType::Image
            } else if entry.is_file_backed() || entry.shared {
                RegionType::Mapped
            } else {
                RegionType::Private
            };

            RegionInfo {
                base_address: Address::new(entry.start),
                size: entry.size(),
                state: if entry.readable {
                    RegionState::Committed
                } else {
                    RegionState::Reserved
                },
                region_type,
                readable: entry.readable,
                writable: entry.writable,
                executable: entry.executable,
            }
        })
        .collect()
}

/// State letter from the contents of `/proc/<pid>/stat`
pub fn parse_stat_state(contents: &str) -> Option<char> {
    // The command name may itself contain ')' so take the last one
    let after_comm = &contents[contents.rfind(')')? + 1..];
    after_comm.trim_start().chars().next()
}

/// Zombie and dead tasks no longer have an address space
pub fn is_live_state(state: char) -> bool {
    !matches!(state, 'Z' | 'X' | 'x')
}

pub fn read_state(pid: ProcessId) -> MemoryResult<char> {
    let stat = fs::read_to_string(proc_path(pid, "stat"))?;
    parse_stat_state(&stat)
        .ok_or_else(|| MemoryError::RegionQuery(format!("Malformed stat for process {}", pid)))
}

pub fn read_maps(pid: ProcessId) -> MemoryResult<Vec<MapsEntry>> {
    let contents = fs::read_to_string(proc_path(pid, "maps"))
        .map_err(|e| MemoryError::RegionQuery(format!("Cannot read maps of {}: {}", pid, e)))?;
    Ok(parse_maps(&contents))
}

pub fn read_comm(pid: ProcessId) -> MemoryResult<String> {
    Ok(fs::read_to_string(proc_path(pid, "comm"))?.trim_end().to_string())
}

/// Start of the first mapping of the process's executable
pub fn executable_base(pid: ProcessId) -> MemoryResult<Address> {
    let exe = fs::read_link(proc_path(pid, "exe"))?;
    let exe = exe.to_string_lossy();

    read_maps(pid)?
        .iter()
        .find(|entry| entry.path == exe)
        .map(|entry| Address::new(entry.start))
        .ok_or_else(|| MemoryError::RegionQuery(format!("{} is not mapped in {}", exe, pid)))
}
