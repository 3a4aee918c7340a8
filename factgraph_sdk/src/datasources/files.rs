//! File-backed specs: a single path or every file matching a pattern

use super::{host_context, read_host_file};
use factgraph_core::broker::Broker;
use factgraph_core::executor::ComponentError;
use factgraph_core::registry::Component;
use factgraph_core::types::{ContentRecord, Value};
use regex::Regex;
use walkdir::WalkDir;

/// One file at a fixed host path
#[derive(Debug, Clone)]
pub struct SimpleFile {
    path: String,
    raw: bool,
}

impl SimpleFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw: false,
        }
    }

    /// Keep the content byte-for-byte instead of splitting it into lines
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Component for SimpleFile {
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError> {
        let context = host_context(broker)?;
        let text = read_host_file(&context.resolve(&self.path))?;

        let record = if self.raw {
            ContentRecord::raw(self.path.as_str(), text)
        } else {
            ContentRecord::from_text(self.path.as_str(), &text)
        };
        Ok(record.into())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path)
    }
}

/// Every regular file in a directory whose name matches a pattern
#[derive(Debug, Clone)]
pub struct GlobFile {
    directory: String,
    pattern: Regex,
    max_depth: usize,
}

impl GlobFile {
    pub fn new(directory: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            directory: directory.into(),
            pattern: Regex::new(pattern)?,
            max_depth: 1,
        })
    }

    /// Descend into subdirectories up to `depth` levels
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }
}

impl Component for GlobFile {
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError> {
        let context = host_context(broker)?;
        let directory = context.resolve(&self.directory);

        let mut records = Vec::new();
        for entry in WalkDir::new(&directory)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.pattern.is_match(&e.file_name().to_string_lossy()))
        {
            let relative = entry
                .path()
                .strip_prefix(&context.root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .to_string();

            // Unreadable matches are left out of the list
            if let Ok(text) = read_host_file(entry.path()) {
                records.push(ContentRecord::from_text(relative, &text));
            }
        }

        if records.is_empty() {
            return Err(ComponentError::skip(format!(
                "no files matching '{}' in {}",
                self.pattern,
                self.directory
            )));
        }

        Ok(records.into())
    }

    fn describe(&self) -> String {
        format!("glob {}/{}", self.directory, self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::{HostContext, HOST_CONTEXT};
    use assert_matches::assert_matches;
    use std::fs;

    fn broker_for(root: &std::path::Path) -> Broker {
        let mut broker = Broker::new();
        broker.insert(
            HOST_CONTEXT,
            Value::data(&HostContext::new(root, "box")).unwrap(),
        );
        broker
    }

    #[test]
    fn test_simple_file() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("proc/net")).unwrap();
        fs::write(root.path().join("proc/net/snmp"), "Udp: NoPorts  \nUdp: 3\n").unwrap();

        let broker = broker_for(root.path());
        let value = SimpleFile::new("/proc/net/snmp").invoke(&broker).unwrap();
        let record = value.as_content().unwrap();
        assert_eq!(record.path, "/proc/net/snmp");
        assert_eq!(record.lines(), vec!["Udp: NoPorts", "Udp: 3"]);

        let raw = SimpleFile::new("/proc/net/snmp").raw().invoke(&broker).unwrap();
        assert!(raw.as_content().unwrap().content.is_raw());
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let broker = broker_for(root.path());
        let result = SimpleFile::new("/etc/snmp/snmpd.conf").invoke(&broker);
        assert_matches!(result, Err(ComponentError::Skip(_)));
    }

    #[test]
    fn test_glob_file_matches_in_order() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("etc/snmp");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("snmpd.conf"), "rocommunity public").unwrap();
        fs::write(dir.join("snmp.conf"), "defversion 2c").unwrap();
        fs::write(dir.join("README"), "not config").unwrap();

        let broker = broker_for(root.path());
        let glob = GlobFile::new("/etc/snmp", r"\.conf$").unwrap();
        let value = glob.invoke(&broker).unwrap();

        let paths: Vec<&str> = value
            .as_content_list()
            .unwrap()
            .iter()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(paths, vec!["/etc/snmp/snmp.conf", "/etc/snmp/snmpd.conf"]);
    }

    #[test]
    fn test_glob_without_matches_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        let broker = broker_for(root.path());
        let glob = GlobFile::new("/etc/snmp", r"\.conf$").unwrap();
        assert_matches!(glob.invoke(&broker), Err(ComponentError::Skip(_)));
        assert!(GlobFile::new("/etc", "(").is_err());
    }
}
