//! YOLO pose label lines
//!
//! A line reads `class cx cy w h` followed by one `x y v` triple per keypoint,
//! all coordinates normalized to [0, 1]. Tokens keep their original text so a
//! line that needs no correction is written back exactly as it was read.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::BoxPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelParseError {
    #[error("expected at least 5 values, found {0}")]
    TooFewValues(usize),
    #[error("not a number: {0:?}")]
    InvalidNumber(String),
    #[error("{0} keypoint value(s) do not form complete x y v triples")]
    IncompleteKeypoint(usize),
}

/// A numeric token together with the text it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub value: f64,
}

impl FromStr for Token {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = f64::from_str(s).map_err(|_| LabelParseError::InvalidNumber(s.to_string()))?;
        Ok(Token {
            text: s.to_string(),
            value,
        })
    }
}

impl Token {
    fn literal(text: &str, value: f64) -> Self {
        Token {
            text: text.to_string(),
            value,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Whether a normalized coordinate lies in [0, 1]. NaN never does.
pub fn is_valid_coord(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keypoint {
    pub x: Token,
    pub y: Token,
    pub visibility: Token,
}

impl Keypoint {
    /// Placeholder written in place of an out-of-range keypoint
    pub fn zeroed() -> Self {
        Keypoint {
            x: Token::literal("0.0", 0.0),
            y: Token::literal("0.0", 0.0),
            visibility: Token::literal("0", 0.0),
        }
    }

    pub fn in_range(&self) -> bool {
        is_valid_coord(self.x.value) && is_valid_coord(self.y.value)
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.value != 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLine {
    pub class_id: String,
    pub bbox: [Token; 4],
    pub keypoints: Vec<Keypoint>,
}

impl FromStr for LabelLine {
    type Err = LabelParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() < 5 {
            return Err(LabelParseError::TooFewValues(values.len()));
        }

        let bbox: [Token; 4] = [
            values[1].parse()?,
            values[2].parse()?,
            values[3].parse()?,
            values[4].parse()?,
        ];

        let rest = &values[5..];
        if rest.len() % 3 != 0 {
            return Err(LabelParseError::IncompleteKeypoint(rest.len()));
        }
        let keypoints = rest
            .chunks_exact(3)
            .map(|triple| -> Result<Keypoint, LabelParseError> {
                Ok(Keypoint {
                    x: triple[0].parse()?,
                    y: triple[1].parse()?,
                    visibility: triple[2].parse()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LabelLine {
            class_id: values[0].to_string(),
            bbox,
            keypoints,
        })
    }
}

impl fmt::Display for LabelLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_id)?;
        for token in &self.bbox {
            write!(f, " {}", token)?;
        }
        for keypoint in &self.keypoints {
            write!(f, " {} {} {}", keypoint.x, keypoint.y, keypoint.visibility)?;
        }
        Ok(())
    }
}

impl LabelLine {
    pub fn bbox_in_range(&self) -> bool {
        self.bbox.iter().all(|token| is_valid_coord(token.value))
    }
}

/// Why a line did not survive sanitizing
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    Malformed(LabelParseError),
    BoxOutOfRange,
    NoVisibleKeypoints,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Malformed(e) => write!(f, "malformed line ({})", e),
            DropReason::BoxOutOfRange => f.write_str("bounding box out of range"),
            DropReason::NoVisibleKeypoints => f.write_str("no valid keypoints left"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Kept {
        line: LabelLine,
        keypoints_zeroed: usize,
        box_out_of_range: bool,
    },
    Dropped(DropReason),
}

/// Correct one label line.
///
/// Keypoints outside [0, 1] become `0.0 0.0 0`; in-range keypoints are kept
/// verbatim. The line survives only if at least one in-range keypoint is
/// visible. An out-of-range box is handled according to `box_policy`.
pub fn sanitize_line(raw: &str, box_policy: BoxPolicy) -> LineOutcome {
    let mut line: LabelLine = match raw.parse() {
        Ok(line) => line,
        Err(e) => return LineOutcome::Dropped(DropReason::Malformed(e)),
    };

    let box_out_of_range = !line.bbox_in_range();
    if box_out_of_range && box_policy == BoxPolicy::Drop {
        return LineOutcome::Dropped(DropReason::BoxOutOfRange);
    }

    let mut keypoints_zeroed = 0;
    let mut any_visible = false;
    for keypoint in &mut line.keypoints {
        if keypoint.in_range() {
            any_visible |= keypoint.is_visible();
        } else {
            *keypoint = Keypoint::zeroed();
            keypoints_zeroed += 1;
        }
    }

    if !any_visible {
        return LineOutcome::Dropped(DropReason::NoVisibleKeypoints);
    }

    LineOutcome::Kept {
        line,
        keypoints_zeroed,
        box_out_of_range,
    }
}
