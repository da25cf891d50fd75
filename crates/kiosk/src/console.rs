//! The terminal dialogue: choosing locations and stepping through a route.

use std::io::{self, Write};

use model::{location::Location, WithId};
use navigation::{
    narration::{NarrationEvent, Narrator},
    playback::PlaybackController,
    search::{LocationPicker, PickerResults},
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    sync::mpsc::UnboundedReceiver,
};

/// How the visitor left a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Back to choosing a destination.
    Back,
    EndOfInput,
}

pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    async fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{} ", prompt)?;
        self.out.flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_owned()))
    }

    /// Lets the user narrow `locations` down by typing part of a name and
    /// pick one by its number. `None` when the user quits or the input ends.
    pub async fn pick(
        &mut self,
        title: &str,
        empty_notice: &str,
        locations: Vec<WithId<Location>>,
    ) -> io::Result<Option<WithId<Location>>> {
        let mut picker = LocationPicker::new(locations);
        loop {
            writeln!(self.out, "\n{}", title)?;
            let visible = match picker.results() {
                PickerResults::Empty => {
                    self.say(empty_notice)?;
                    return Ok(None);
                }
                PickerResults::NoMatches { term } => {
                    writeln!(self.out, "No locations match '{}'.", term)?;
                    vec![]
                }
                PickerResults::Matches(groups) => {
                    let visible = groups.visible().cloned().collect::<Vec<_>>();
                    for (number, location) in visible.iter().enumerate() {
                        writeln!(self.out, "  {:>2}. {}", number + 1, location.content.name)?;
                    }
                    if !groups.classrooms.is_empty() {
                        let state = if groups.classrooms_open { "hide" } else { "show" };
                        writeln!(
                            self.out,
                            "  [c] {} {} classrooms",
                            state,
                            groups.classrooms.len()
                        )?;
                    }
                    visible
                }
            };

            let Some(input) = self
                .prompt("Number, search term, 'c' or 'q':")
                .await?
            else {
                return Ok(None);
            };
            match input.as_str() {
                "q" => return Ok(None),
                "c" => picker.toggle_classrooms(),
                _ => match input.parse::<usize>() {
                    Ok(number) if (1..=visible.len()).contains(&number) => {
                        return Ok(visible.into_iter().nth(number - 1));
                    }
                    Ok(_) => self.say("There is no location with that number.")?,
                    Err(_) => picker.search(input),
                },
            }
        }
    }

    /// Steps through the route of `playback` until the user goes back or the
    /// input ends. Narration events arriving meanwhile are handed to the
    /// controller.
    pub async fn play<N: Narrator>(
        &mut self,
        playback: &mut PlaybackController<N>,
        events: &mut UnboundedReceiver<NarrationEvent>,
    ) -> io::Result<Exit> {
        let route = &playback.route().content;
        writeln!(
            self.out,
            "\nFrom {} to {}",
            route.start_location, route.end_location
        )?;
        self.show_step(playback)?;

        let mut events_open = true;
        loop {
            let commands = if playback.narration_supported() {
                "[n]ext, [p]revious, step number, [s]peak, [b]ack:"
            } else {
                "[n]ext, [p]revious, step number, [b]ack:"
            };
            write!(self.out, "{} ", commands)?;
            self.out.flush()?;

            let line = tokio::select! {
                line = self.lines.next_line() => line?,
                event = events.recv(), if events_open => {
                    match event {
                        Some(event) => playback.on_narration_event(&event),
                        None => events_open = false,
                    }
                    writeln!(self.out)?;
                    continue;
                }
            };
            let Some(line) = line else {
                return Ok(Exit::EndOfInput);
            };

            match line.trim() {
                "b" | "q" => return Ok(Exit::Back),
                "" | "n" => {
                    if playback.next() {
                        self.show_step(playback)?;
                    } else {
                        self.say("You have arrived.")?;
                    }
                }
                "p" => {
                    if playback.previous() {
                        self.show_step(playback)?;
                    } else {
                        self.say("This is the first step.")?;
                    }
                }
                "s" => match playback.toggle_narration() {
                    Ok(true) => self.say("Reading the step aloud.")?,
                    Ok(false) => self.say("Stopped reading aloud.")?,
                    Err(why) => self.say(&why.to_string())?,
                },
                other => match other.parse::<usize>() {
                    Ok(number) if number >= 1 && playback.go_to_step(number - 1) => {
                        self.show_step(playback)?
                    }
                    _ => self.say("Unknown command.")?,
                },
            }
        }
    }

    fn show_step<N: Narrator>(&mut self, playback: &PlaybackController<N>) -> io::Result<()> {
        writeln!(self.out, "\n{}", playback.step_label())?;
        if let Some(step) = playback.current_step() {
            writeln!(self.out, "{}", step.text)?;
            if let Some(map) = step.map_url() {
                writeln!(self.out, "Map: {}", map)?;
            }
        }
        Ok(())
    }
}
