//! The interactive command layer: one command per line, statuses written to
//! an injected sink so they can be captured independently of the log.

use std::io::{self, BufRead, Write};

use crate::error::{FsError, Result};
use crate::fs::{FileSystem, LsEntry, NodeInfo};
use crate::image::ImageDevice;

pub const KB: u64 = 1_000;
pub const MB: u64 = 1_000_000;
pub const GB: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Cp(String, String),
    Mv(String, String),
    Rm(String),
    Mkdir(String),
    Rmdir(String),
    Ls(Option<String>),
    Cat(String),
    Cd(String),
    Pwd,
    Incp(String, Option<String>),
    Outcp(String, String),
    Info(String),
    Load(String),
    Format(u64),
    Slink(String, String),
    Help,
    Exit,
}

enum Parsed {
    Empty,
    Command(Command),
    Invalid,
    Unknown,
}

const COMMAND_NAMES: [&str; 17] = [
    "cp", "mv", "rm", "mkdir", "rmdir", "ls", "cat", "cd", "pwd", "incp", "outcp", "info",
    "load", "format", "slink", "help", "exit",
];

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parses a `format` size: a plain byte count or a magnitude with a decimal
/// KB/MB/GB suffix.
fn parse_size(token: &str) -> Option<u64> {
    for (suffix, multiplier) in [("KB", KB), ("MB", MB), ("GB", GB)] {
        if let Some(magnitude) = token.strip_suffix(suffix) {
            return parse_digits(magnitude).and_then(|n| n.checked_mul(multiplier));
        }
    }
    parse_digits(token)
}

fn parse_line(line: &str) -> Parsed {
    let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();
    let Some(&name) = tokens.first() else {
        return Parsed::Empty;
    };
    let args = &tokens[1..];
    let command = match (name, args) {
        ("cp", [s1, s2]) => Command::Cp(s1.to_string(), s2.to_string()),
        ("mv", [s1, s2]) => Command::Mv(s1.to_string(), s2.to_string()),
        ("rm", [s1]) => Command::Rm(s1.to_string()),
        ("mkdir", [a1]) => Command::Mkdir(a1.to_string()),
        ("rmdir", [a1]) => Command::Rmdir(a1.to_string()),
        ("ls", []) => Command::Ls(None),
        ("ls", [a1]) => Command::Ls(Some(a1.to_string())),
        ("cat", [s1]) => Command::Cat(s1.to_string()),
        ("cd", [a1]) => Command::Cd(a1.to_string()),
        ("pwd", []) => Command::Pwd,
        ("incp", [h]) => Command::Incp(h.to_string(), None),
        ("incp", [h, s1]) => Command::Incp(h.to_string(), Some(s1.to_string())),
        ("outcp", [s1, h]) => Command::Outcp(s1.to_string(), h.to_string()),
        ("info", [x]) => Command::Info(x.to_string()),
        ("load", [f]) => Command::Load(f.to_string()),
        ("format", [size]) => match parse_size(size) {
            Some(bytes) => Command::Format(bytes),
            None => return Parsed::Invalid,
        },
        ("slink", [s1, s2]) => Command::Slink(s1.to_string(), s2.to_string()),
        ("help", []) => Command::Help,
        ("exit", []) => Command::Exit,
        _ if COMMAND_NAMES.contains(&name) => return Parsed::Invalid,
        _ => return Parsed::Unknown,
    };
    Parsed::Command(command)
}

/// Drives a [`FileSystem`] from command lines, writing every user-facing
/// status to the given sink.
pub struct Shell<D: ImageDevice, W: Write> {
    fs: FileSystem<D>,
    out: W,
}

impl<D: ImageDevice, W: Write> Shell<D, W> {
    pub fn new(fs: FileSystem<D>, out: W) -> Self {
        Shell { fs, out }
    }

    pub fn fs(&self) -> &FileSystem<D> {
        &self.fs
    }

    /// The interactive loop: prompt with the current path, read a line,
    /// execute it, until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut line = String::new();
        loop {
            let prompt = self.fs.current_path().unwrap_or_else(|_| String::from("/"));
            write!(self.out, "{}> ", prompt)?;
            self.out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            if self.execute_line(line.trim_end_matches(['\r', '\n']))? {
                return Ok(());
            }
        }
    }

    /// Executes a single command line; returns `true` when the session
    /// should end.
    pub fn execute_line(&mut self, line: &str) -> io::Result<bool> {
        let command = match parse_line(line) {
            Parsed::Empty => return Ok(false),
            Parsed::Invalid => {
                writeln!(self.out, "INVALID COMMAND")?;
                return Ok(false);
            }
            Parsed::Unknown => {
                writeln!(self.out, "UNKNOWN COMMAND")?;
                return Ok(false);
            }
            Parsed::Command(command) => command,
        };

        match command {
            Command::Exit => return Ok(true),
            Command::Help => self.print_help()?,
            Command::Pwd => {
                let result = self.fs.current_path();
                match result {
                    Ok(path) => writeln!(self.out, "{}", path)?,
                    Err(e) => self.report(e)?,
                }
            }
            Command::Ls(path) => {
                let result = self.fs.ls(path.as_deref());
                match result {
                    Ok(entries) => self.print_listing(&entries)?,
                    Err(e) => self.report(e)?,
                }
            }
            Command::Cat(path) => {
                let result = self.fs.cat(&path);
                match result {
                    Ok(content) => self.out.write_all(&content)?,
                    Err(e) => self.report(e)?,
                }
            }
            Command::Info(path) => {
                let result = self.fs.info(&path);
                match result {
                    Ok(info) => self.print_info(&info)?,
                    Err(e) => self.report(e)?,
                }
            }
            Command::Cd(path) => {
                let result = self.fs.cd(&path);
                self.status(result)?;
            }
            Command::Mkdir(path) => {
                let result = self.fs.mkdir(&path);
                self.status(result)?;
            }
            Command::Rmdir(path) => {
                let result = self.fs.rmdir(&path);
                self.status(result)?;
            }
            Command::Rm(path) => {
                let result = self.fs.rm(&path);
                self.status(result)?;
            }
            Command::Cp(source, destination) => {
                let result = self.fs.cp(&source, &destination);
                self.status(result)?;
            }
            Command::Mv(source, destination) => {
                let result = self.fs.mv(&source, &destination);
                self.status(result)?;
            }
            Command::Incp(host, destination) => {
                let result = self.fs.incp(&host, destination.as_deref());
                self.status(result)?;
            }
            Command::Outcp(source, host) => {
                let result = self.fs.outcp(&source, &host);
                self.status(result)?;
            }
            Command::Slink(target, link_name) => {
                let result = self.fs.slink(&target, &link_name);
                self.status(result)?;
            }
            Command::Format(bytes) => {
                writeln!(self.out, "FORMATTING DISK ({}B)", bytes)?;
                let result = self.fs.reformat(bytes);
                self.status(result)?;
            }
            Command::Load(path) => self.load_script(&path)?,
        }
        Ok(false)
    }

    /// Replays commands from a host file, echoing each line before running
    /// it.
    fn load_script(&mut self, path: &str) -> io::Result<()> {
        let Ok(script) = std::fs::read_to_string(path) else {
            writeln!(self.out, "FILE NOT FOUND")?;
            return Ok(());
        };
        for line in script.lines() {
            writeln!(self.out, "{}", line)?;
            self.execute_line(line)?;
        }
        writeln!(self.out, "OK")?;
        Ok(())
    }

    fn status(&mut self, result: Result<()>) -> io::Result<()> {
        match result {
            Ok(()) => writeln!(self.out, "OK"),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: FsError) -> io::Result<()> {
        if error.is_user_status() {
            writeln!(self.out, "{}", error)
        } else {
            log::error!("{}", error);
            Ok(())
        }
    }

    fn print_listing(&mut self, entries: &[LsEntry]) -> io::Result<()> {
        writeln!(self.out, "{:<10}{:<7}{}", "size(B)", "inode", "p-inode")?;
        for entry in entries {
            let marker = if entry.is_directory { "[+]" } else { "[-]" };
            write!(
                self.out,
                "{:<10}{:<7}{:<8}{} {}",
                entry.size, entry.node_id, entry.parent_id, marker, entry.name
            )?;
            if let Some(target) = &entry.link_target {
                write!(self.out, " -> {}", target)?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn print_info(&mut self, info: &NodeInfo) -> io::Result<()> {
        writeln!(self.out, "<[I-NODE]>")?;
        writeln!(self.out, "i-node id:        {}", info.node_id)?;
        writeln!(self.out, "i-node parent id: {}", info.parent_id)?;
        writeln!(self.out, "size:             {}", info.size)?;
        writeln!(self.out, "free:             {}", info.is_free)?;
        writeln!(self.out, "directory:        {}", info.is_directory)?;
        writeln!(self.out, "slink:            {}", info.is_symlink)?;
        for (i, pointer) in info.direct.iter().enumerate() {
            writeln!(self.out, "direct ({}):       {}", i + 1, pointer)?;
        }
        for (i, pointer) in info.indirect.iter().enumerate() {
            writeln!(self.out, "indirect ({}):     {}", i + 1, pointer)?;
        }
        write!(self.out, "clusters:  [")?;
        if let Some(clusters) = &info.clusters {
            let rendered: Vec<String> = clusters.iter().map(|c| c.to_string()).collect();
            write!(self.out, "{}", rendered.join(" "))?;
        }
        writeln!(self.out, "]")?;
        Ok(())
    }

    fn print_help(&mut self) -> io::Result<()> {
        const HELP: [(&str, &str); 17] = [
            ("cat s1", "- prints out the content of file s1"),
            ("cd a1", "- changes the current path into folder a1"),
            ("cp s1 s2", "- copies file s1 into file s2"),
            ("exit", "- closes the application"),
            ("format 600MB", "- formats the file given as a parameter"),
            ("help", "- prints out help"),
            ("incp s1 s2", "- load file s1 into the file system (directory s2)"),
            ("info a1/s1", "- prints out information about the i-node"),
            ("load s1", "- loads commands stored in file s1 and executes them"),
            ("ls a1", "- prints out the content of folder a1"),
            ("mkdir a1", "- creates a new folder a1"),
            ("mv s1 s2", "- moves file s1 into file s2"),
            ("outcp s1 s2", "- exports file s1 out onto the physical disk (directory s2)"),
            ("pwd", "- prints out the current path"),
            ("rm s1", "- removes file s1"),
            ("rmdir a1", "- removes folder a1"),
            ("slink s1 s2", "- creates a symbolic link s2 pointing at file s1"),
        ];
        for (usage, description) in HELP {
            writeln!(self.out, "{:<15}{}", usage, description)?;
        }
        Ok(())
    }
}
