use std::io::{self, Write};

/// Destination for rendered table text.
///
/// Text carries its own line control (`"\n\r"` to advance, `"\r"` to
/// overwrite the current line), so sinks write it verbatim.
pub trait ConsoleSink {
    fn write(&mut self, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

pub struct StdoutConsole;

impl Default for StdoutConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for StdoutConsole {
    fn write(&mut self, text: &str) -> io::Result<()> {
        io::stdout().write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// In-memory sink; clones share one buffer so tests can keep a handle while
/// the table owns another.
#[derive(Clone, Default)]
pub struct MemoryConsole {
    buffer: std::rc::Rc<std::cell::RefCell<MemoryBuffer>>,
}

#[derive(Default)]
struct MemoryBuffer {
    output: String,
    flush_count: usize,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> String {
        self.buffer.borrow().output.clone()
    }

    pub fn flush_count(&self) -> usize {
        self.buffer.borrow().flush_count
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().output.clear();
    }
}

impl ConsoleSink for MemoryConsole {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.buffer.borrow_mut().output.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buffer.borrow_mut().flush_count += 1;
        Ok(())
    }
}
