//! Motion-hierarchy parser.
//!
//! A one-token-lookahead state machine over whitespace-tokenized lines:
//! `Start -> Hierarchy -> Joint -> Motion -> FrameData`. Joint nesting is
//! tracked with an explicit stack instead of recursive calls, so call
//! depth never couples to rig depth (some rigs nest 30+ joints).
//!
//! Parsing is all-or-nothing: any malformed input aborts with the line
//! number and raw text, and no partial clip is returned.

use std::fs;
use std::path::Path;

use glam::Vec3;
use smallvec::SmallVec;

use crate::bvh::{Channel, JointData, MotionClip};
use crate::errors::{MarrowError, Result};

/// Parses a motion file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<MotionClip> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let clip = parse_str(&text)?;
    clip.log_info(&path.display().to_string());
    Ok(clip)
}

/// Parses motion-file text.
pub fn parse_str(text: &str) -> Result<MotionClip> {
    Parser::new(text).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Hierarchy,
    Joint,
    Motion,
    FrameData,
}

/// Line source with a running 1-based line counter.
struct Lines<'a> {
    iter: std::str::Lines<'a>,
    number: usize,
}

impl<'a> Lines<'a> {
    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.iter.next().map(|line| {
            self.number += 1;
            (self.number, line)
        })
    }
}

struct Parser<'a> {
    lines: Lines<'a>,
    state: State,
    joints: Vec<JointData>,
    /// Open joint scopes, by declaration index.
    stack: Vec<usize>,
    declared_frames: Option<usize>,
    frame_time: Option<f32>,
    parsed_frames: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: Lines {
                iter: text.lines(),
                number: 0,
            },
            state: State::Start,
            joints: Vec::new(),
            stack: Vec::new(),
            declared_frames: None,
            frame_time: None,
            parsed_frames: 0,
        }
    }

    fn run(mut self) -> Result<MotionClip> {
        while let Some((line, raw)) = self.lines.next() {
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            match self.state {
                State::Start => self.on_start(line, raw, &tokens)?,
                State::Hierarchy => self.on_hierarchy(line, raw, &tokens)?,
                State::Joint => self.on_joint(line, raw, &tokens)?,
                State::Motion => self.on_motion(line, raw, &tokens)?,
                State::FrameData => self.on_frame_line(line, &tokens)?,
            }
        }

        if self.state != State::FrameData {
            return Err(MarrowError::UnexpectedEof {
                line: self.lines.number,
            });
        }

        // Both are guaranteed set once FrameData is reached.
        let declared = self.declared_frames.unwrap_or(0);
        let frame_time = self.frame_time.unwrap_or(0.0);

        if self.parsed_frames != declared {
            return Err(MarrowError::FrameCountMismatch {
                declared,
                parsed: self.parsed_frames,
            });
        }

        Ok(MotionClip {
            joints: self.joints,
            frame_count: declared,
            frame_time,
        })
    }

    fn on_start(&mut self, line: usize, raw: &str, tokens: &[&str]) -> Result<()> {
        if tokens[0] != "HIERARCHY" {
            return Err(syntax(line, raw));
        }
        self.state = State::Hierarchy;
        Ok(())
    }

    fn on_hierarchy(&mut self, line: usize, raw: &str, tokens: &[&str]) -> Result<()> {
        if tokens[0] != "ROOT" || tokens.len() != 2 {
            return Err(syntax(line, raw));
        }
        let name = tokens[1].to_string();
        let (offset, channels) = self.read_joint_header()?;

        let root = JointData::new(name, 0, offset, channels, None);
        self.joints.push(root);
        self.stack.push(0);
        self.state = State::Joint;
        Ok(())
    }

    fn on_joint(&mut self, line: usize, raw: &str, tokens: &[&str]) -> Result<()> {
        match tokens[0] {
            "JOINT" => {
                if tokens.len() != 2 {
                    return Err(syntax(line, raw));
                }
                let name = tokens[1].to_string();
                let (offset, channels) = self.read_joint_header()?;

                let Some(&parent) = self.stack.last() else {
                    return Err(syntax(line, raw));
                };
                let index = self.joints.len();
                self.joints[parent].children.push(index);
                // A child's offset is a reference point on the parent bone.
                self.joints[parent].end_points.push(offset);
                self.joints
                    .push(JointData::new(name, index, offset, channels, Some(parent)));
                self.stack.push(index);
            }
            "End" => {
                if tokens.get(1) != Some(&"Site") {
                    return Err(syntax(line, raw));
                }
                let Some(&current) = self.stack.last() else {
                    return Err(syntax(line, raw));
                };
                let offset = self.read_end_site()?;
                self.joints[current].end_points.push(offset);
                self.joints[current].is_end_site = true;
            }
            "}" => {
                if self.stack.pop().is_none() {
                    return Err(syntax(line, raw));
                }
            }
            "MOTION" => {
                if !self.stack.is_empty() {
                    return Err(MarrowError::UnbalancedHierarchy { line });
                }
                self.state = State::Motion;
            }
            _ => return Err(syntax(line, raw)),
        }
        Ok(())
    }

    fn on_motion(&mut self, line: usize, raw: &str, tokens: &[&str]) -> Result<()> {
        match tokens[0] {
            "Frames:" => {
                if tokens.len() != 2 {
                    return Err(syntax(line, raw));
                }
                self.declared_frames = Some(parse_usize(line, tokens[1])?);
            }
            "Frame" if tokens.get(1) == Some(&"Time:") => {
                // `Frames:` must have come first and be non-zero.
                if tokens.len() != 3 || self.declared_frames.unwrap_or(0) == 0 {
                    return Err(syntax(line, raw));
                }
                self.frame_time = Some(parse_f32(line, tokens[2])?);
                self.state = State::FrameData;
            }
            _ => return Err(syntax(line, raw)),
        }
        Ok(())
    }

    /// One motion line: tokens sliced sequentially across joints in
    /// declaration order, each joint consuming exactly its channel count.
    fn on_frame_line(&mut self, line: usize, tokens: &[&str]) -> Result<()> {
        let expected: usize = self.joints.iter().map(JointData::channel_count).sum();
        if tokens.len() != expected {
            return Err(MarrowError::FrameDataMismatch {
                line,
                expected,
                found: tokens.len(),
            });
        }

        let mut cursor = 0;
        for joint in &mut self.joints {
            let count = joint.channel_count();
            let mut tuple = Vec::with_capacity(count);
            for token in &tokens[cursor..cursor + count] {
                tuple.push(parse_f32(line, token)?);
            }
            joint.frames.push(tuple);
            cursor += count;
        }
        self.parsed_frames += 1;
        Ok(())
    }

    /// Shared nested-block reader for `ROOT` and `JOINT`: consumes lines
    /// (skipping blanks and the opening `{`) until it has seen an
    /// `OFFSET` followed by a `CHANNELS` declaration.
    fn read_joint_header(&mut self) -> Result<(Vec3, SmallVec<[Channel; 6]>)> {
        let mut offset: Option<Vec3> = None;
        loop {
            let Some((line, raw)) = self.lines.next() else {
                return Err(MarrowError::UnexpectedEof {
                    line: self.lines.number,
                });
            };
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            match tokens.first() {
                None | Some(&"{") => {}
                Some(&"OFFSET") => {
                    if tokens.len() != 4 {
                        return Err(syntax(line, raw));
                    }
                    offset = Some(Vec3::new(
                        parse_f32(line, tokens[1])?,
                        parse_f32(line, tokens[2])?,
                        parse_f32(line, tokens[3])?,
                    ));
                }
                Some(&"CHANNELS") => {
                    let Some(offset) = offset else {
                        return Err(MarrowError::MissingOffset {
                            line,
                            text: raw.to_string(),
                        });
                    };
                    if tokens.len() < 2 {
                        return Err(syntax(line, raw));
                    }
                    let count = parse_usize(line, tokens[1])?;
                    if tokens.len() != 2 + count {
                        return Err(syntax(line, raw));
                    }
                    let mut channels = SmallVec::new();
                    for token in &tokens[2..] {
                        let Some(channel) = Channel::parse(token) else {
                            return Err(MarrowError::UnknownChannel {
                                line,
                                name: (*token).to_string(),
                            });
                        };
                        channels.push(channel);
                    }
                    return Ok((offset, channels));
                }
                Some(_) => return Err(syntax(line, raw)),
            }
        }
    }

    /// `End Site` block: a single `OFFSET` between braces, no channels.
    fn read_end_site(&mut self) -> Result<Vec3> {
        let mut offset: Option<Vec3> = None;
        loop {
            let Some((line, raw)) = self.lines.next() else {
                return Err(MarrowError::UnexpectedEof {
                    line: self.lines.number,
                });
            };
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            match tokens.first() {
                None | Some(&"{") => {}
                Some(&"OFFSET") => {
                    if tokens.len() != 4 {
                        return Err(syntax(line, raw));
                    }
                    offset = Some(Vec3::new(
                        parse_f32(line, tokens[1])?,
                        parse_f32(line, tokens[2])?,
                        parse_f32(line, tokens[3])?,
                    ));
                }
                Some(&"}") => {
                    return offset.ok_or(MarrowError::MissingEndSiteOffset { line });
                }
                Some(_) => return Err(syntax(line, raw)),
            }
        }
    }
}

fn syntax(line: usize, raw: &str) -> MarrowError {
    MarrowError::Syntax {
        line,
        text: raw.trim_end().to_string(),
    }
}

fn parse_f32(line: usize, token: &str) -> Result<f32> {
    token.parse().map_err(|_| MarrowError::BadNumber {
        line,
        text: token.to_string(),
    })
}

fn parse_usize(line: usize, token: &str) -> Result<usize> {
    token.parse().map_err(|_| MarrowError::BadNumber {
        line,
        text: token.to_string(),
    })
}
