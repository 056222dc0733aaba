use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{Event, KeyEvent, read, poll};
use crossterm::style::{Attribute, Color};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::debug;

use crate::render::{Frame, Glyph, Paint};

pub type TermInt = u16;
pub type TermCoords = (TermInt, TermInt);

pub struct TermManager {
    stdout: Stdout,
    active: bool,
    frame: Option<Frame>,
    current_msg: Option<Message>,
}

struct Message {
    lines: Vec<String>,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout(), active: false, frame: None, current_msg: None }
    }

    /// Terminal size as `(columns, rows)`.
    pub fn size() -> crossterm::Result<TermCoords> {
        terminal::size()
    }

    pub fn setup(&mut self) -> crossterm::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        debug!("Terminal set up");
        Ok(())
    }

    pub fn restore(&mut self) -> crossterm::Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        debug!("Terminal restored");
        Ok(())
    }

    pub fn read_key_blocking(&self) -> crossterm::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for a key press.
    pub fn poll_key(&self, timeout: Duration) -> crossterm::Result<Option<KeyEvent>> {
        if poll(timeout)? {
            if let Event::Key(ev) = read()? {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }

    /// Clears the screen and draws `frame` in the top left corner, along
    /// with any message currently shown.
    pub fn draw_frame(&mut self, frame: Frame) -> crossterm::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;

        for (y, row) in frame.rows().enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, y as TermInt))?;
            for glyph in row {
                self.print_glyph(*glyph)?;
            }
        }

        queue!(
            self.stdout,
            cursor::MoveTo(0, frame.height() as TermInt),
            style::Print(frame.status())
        )?;

        self.frame = Some(frame);
        if let Some(msg) = self.current_msg.take() {
            self.print_message(&msg)?;
            self.current_msg = Some(msg);
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> crossterm::Result<()> {
        let msg = Message::new(lines);
        self.print_message(&msg)?;
        self.current_msg = Some(msg);
        self.flush()
    }

    pub fn hide_message(&mut self) -> crossterm::Result<()> {
        if self.current_msg.take().is_none() {
            return Ok(());
        }

        // Redrawing the last frame wipes the message box
        match self.frame.take() {
            Some(frame) => self.draw_frame(frame),
            None => {
                execute!(self.stdout, terminal::Clear(ClearType::All))?;
                Ok(())
            }
        }
    }

    pub fn flush(&mut self) -> crossterm::Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_message(&mut self, msg: &Message) -> crossterm::Result<()> {
        let msg_height = msg.height();
        let msg_width = msg.width();

        // Center on the board if there is one, otherwise on the screen
        let (area_width, area_height) = match &self.frame {
            Some(frame) => (frame.width() as TermInt, frame.height() as TermInt),
            None => terminal::size()?,
        };
        let top_left = (
            (area_width / 2).saturating_sub(msg_width / 2),
            (area_height / 2).saturating_sub(msg_height / 2),
        );

        // Blank line above and below the text
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            queue!(
                self.stdout,
                cursor::MoveTo(top_left.0, *y),
                style::SetAttribute(Attribute::Reverse),
                style::Print(&blank),
                style::SetAttribute(Attribute::Reset)
            )?;
        }

        for (i, line) in msg.lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            queue!(
                self.stdout,
                cursor::MoveTo(top_left.0, y),
                style::SetAttribute(Attribute::Reverse),
                style::Print(padded_line),
                style::SetAttribute(Attribute::Reset)
            )?;
        }

        Ok(())
    }

    fn print_glyph(&mut self, glyph: Glyph) -> crossterm::Result<()> {
        match glyph.paint {
            Paint::Plain => {}
            Paint::Border => queue!(
                self.stdout,
                style::SetForegroundColor(Color::Red),
                style::SetAttribute(Attribute::Bold)
            )?,
            Paint::Head => queue!(self.stdout, style::SetForegroundColor(Color::Yellow))?,
            Paint::Body => queue!(
                self.stdout,
                style::SetForegroundColor(Color::Blue),
                style::SetAttribute(Attribute::Bold)
            )?,
            Paint::Food => queue!(
                self.stdout,
                style::SetBackgroundColor(Color::Green),
                style::SetAttribute(Attribute::Bold)
            )?,
        }

        queue!(self.stdout, style::Print(glyph.ch))?;

        if glyph.paint != Paint::Plain {
            queue!(self.stdout, style::ResetColor, style::SetAttribute(Attribute::Reset))?;
        }

        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Nothing sensible to do if this fails while unwinding
        let _ = self.restore();
    }
}

impl Message {
    fn new(lines: &[&str]) -> Self {
        Message { lines: lines.iter().map(|line| line.to_string()).collect() }
    }

    fn width(&self) -> TermInt {
        message_footprint(&self.lines).0 as TermInt
    }

    fn height(&self) -> TermInt {
        message_footprint(&self.lines).1 as TermInt
    }
}

/// Columns and rows taken by a message box showing `lines`, padding included.
pub fn message_footprint<S: AsRef<str>>(lines: &[S]) -> (usize, usize) {
    let widest = lines.iter().map(|x| x.as_ref().chars().count()).max().unwrap_or(0);
    (widest + 2, lines.len() + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_footprint_pads_each_side() {
        assert_eq!(message_footprint(&["Paused", "Press Esc to resume"]), (21, 4));
        assert_eq!(message_footprint::<&str>(&[]), (2, 2));
    }

    #[test]
    fn test_message_footprint_counts_chars_not_bytes() {
        assert_eq!(message_footprint(&["│─│"]), (5, 3));
    }
}
