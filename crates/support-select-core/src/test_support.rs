//! Recording fake device for selector tests.

use std::collections::VecDeque;
use std::time::Duration;

use crate::device::{Gestures, Notifier, Screen, Sleeper};
use crate::error::Result;
use crate::layout::SupportLayout;
use crate::pattern::PatternKey;
use crate::region::{Point, Region};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Load(String),
    Hold,
    Release,
    Exists(String, Region),
    FindAll(String, Region),
    Click(Point),
    Scroll(Point, Point),
    Sleep(Duration),
    Notify(String),
}

/// One viewport: every template occurrence visible in it.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    items: Vec<(PatternKey, Region)>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: PatternKey, region: Region) -> Self {
        self.items.push((key, region));
        self
    }

    pub fn with_image(self, name: &str, region: Region) -> Self {
        self.with(PatternKey::support_image(name), region)
    }
}

/// A scripted device.
///
/// Scrolling or confirming a refresh advances to the next frame (the last
/// frame repeats). Support-screen checks pop `screen_visible`, then fall back
/// to `screen_visible_default`.
pub struct FakeDevice {
    pub layout: SupportLayout,
    pub frames: Vec<Frame>,
    pub frame: usize,
    pub screen_visible: VecDeque<bool>,
    pub screen_visible_default: bool,
    pub events: Vec<Event>,
    pub holding: bool,
    /// Search queries issued outside a held snapshot.
    pub unheld_queries: usize,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            layout: SupportLayout::default(),
            frames: vec![Frame::new()],
            frame: 0,
            screen_visible: VecDeque::new(),
            screen_visible_default: true,
            events: Vec::new(),
            holding: false,
            unheld_queries: 0,
        }
    }

    pub fn with_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            ..Self::new()
        }
    }

    pub fn with_screen_script(mut self, script: &[bool], then: bool) -> Self {
        self.screen_visible = script.iter().copied().collect();
        self.screen_visible_default = then;
        self
    }

    pub fn scrolls(&self) -> usize {
        self.count(|e| matches!(e, Event::Scroll(..)))
    }

    pub fn clicks(&self) -> Vec<Point> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Click(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn refreshes(&self) -> usize {
        let confirm = self.layout.refresh_confirm;
        self.count(|e| *e == Event::Click(confirm))
    }

    pub fn holds(&self) -> usize {
        self.count(|e| *e == Event::Hold)
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Sleep(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Notify(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    fn advance(&mut self) {
        if self.frame + 1 < self.frames.len() {
            self.frame += 1;
        }
    }

    fn matches(&self, region: Region, key: &PatternKey) -> Vec<Region> {
        self.frames
            .get(self.frame)
            .map(|frame| {
                frame
                    .items
                    .iter()
                    .filter(|(k, r)| k == key && region.contains(r))
                    .map(|(_, r)| *r)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn note_query(&mut self) {
        if !self.holding {
            self.unheld_queries += 1;
        }
    }
}

impl Screen for FakeDevice {
    type Pattern = PatternKey;

    fn load_pattern(&mut self, key: &PatternKey) -> Result<PatternKey> {
        self.events.push(Event::Load(key.logical_name()));
        Ok(key.clone())
    }

    fn exists(&mut self, region: Region, pattern: &PatternKey) -> Result<bool> {
        self.events
            .push(Event::Exists(pattern.logical_name(), region));
        if *pattern == PatternKey::SupportScreen {
            return Ok(self
                .screen_visible
                .pop_front()
                .unwrap_or(self.screen_visible_default));
        }
        self.note_query();
        Ok(!self.matches(region, pattern).is_empty())
    }

    fn find_all(&mut self, region: Region, pattern: &PatternKey) -> Result<Vec<Region>> {
        self.events
            .push(Event::FindAll(pattern.logical_name(), region));
        self.note_query();
        Ok(self.matches(region, pattern))
    }

    fn hold_snapshot(&mut self) -> Result<()> {
        self.events.push(Event::Hold);
        self.holding = true;
        Ok(())
    }

    fn release_snapshot(&mut self) {
        self.events.push(Event::Release);
        self.holding = false;
    }
}

impl Gestures for FakeDevice {
    fn click(&mut self, at: Point) -> Result<()> {
        self.events.push(Event::Click(at));
        if at == self.layout.refresh_confirm {
            self.advance();
        }
        Ok(())
    }

    fn scroll(&mut self, from: Point, to: Point) -> Result<()> {
        self.events.push(Event::Scroll(from, to));
        self.advance();
        Ok(())
    }
}

impl Sleeper for FakeDevice {
    fn sleep(&mut self, duration: Duration) {
        self.events.push(Event::Sleep(duration));
    }
}

impl Notifier for FakeDevice {
    fn notify(&mut self, message: &str) {
        self.events.push(Event::Notify(message.to_string()));
    }
}
