//! Artifact text emission: an indentation-aware XML writer, the output sink
//! abstraction, and file writing.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

/// Escapes text for use in XML character data and double-quoted attribute
/// values. Apostrophes are left as is.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds an XML document line by line with two-space indentation.
///
/// Elements are opened with [`XmlWriter::start`] and closed with
/// [`XmlWriter::end`]; the writer tracks the open element names.
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
    open: Vec<String>,
    base_depth: usize,
}

impl XmlWriter {
    /// Creates an empty writer at depth 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer whose output is nested `depth` levels deep, for
    /// fragments spliced into an enclosing document later.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self {
            base_depth: depth,
            ..Self::default()
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.base_depth + self.open.len() {
            self.buf.push_str("  ");
        }
    }

    fn tag(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(name);
        for (key, value) in attrs {
            let _ = write!(self.buf, " {key}=\"{}\"", escape_xml(value));
        }
    }

    /// Writes the XML declaration.
    pub fn declaration(&mut self) {
        self.buf
            .push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    }

    /// Opens an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.tag(name, attrs);
        self.buf.push_str(">\n");
        self.open.push(name.to_string());
    }

    /// Writes a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.tag(name, attrs);
        self.buf.push_str("/>\n");
    }

    /// Writes an element with text content on one line.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) {
        self.indent();
        self.tag(name, attrs);
        let _ = writeln!(self.buf, ">{}</{name}>", escape_xml(text));
    }

    /// Closes the innermost open element. Does nothing if none is open.
    pub fn end(&mut self) {
        if let Some(name) = self.open.pop() {
            self.indent();
            let _ = writeln!(self.buf, "</{name}>");
        }
    }

    /// Appends pre-rendered lines verbatim.
    pub fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Closes any elements still open and returns the text.
    #[must_use]
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.end();
        }
        self.buf
    }
}

/// Append-only destination of one artifact.
pub trait OutputSink {
    /// Appends a chunk.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn write_chunk(&mut self, chunk: &str) -> io::Result<()>;

    /// Completes the artifact.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn close(&mut self) -> io::Result<()>;
}

/// An [`OutputSink`] over any [`io::Write`].
#[derive(Debug)]
pub struct WriteSink<W: io::Write> {
    inner: W,
}

impl<W: io::Write> WriteSink<W> {
    /// Wraps a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> OutputSink for WriteSink<W> {
    fn write_chunk(&mut self, chunk: &str) -> io::Result<()> {
        self.inner.write_all(chunk.as_bytes())
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl OutputSink for String {
    fn write_chunk(&mut self, chunk: &str) -> io::Result<()> {
        self.push_str(chunk);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes a generated artifact, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write artifact: {}", path.display()))?;
    Ok(())
}
