//! Build-status balls.

use super::status::StatusIcon;
use crate::error::IconError;
use crate::l10n::Localizable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ANIME_SUFFIX: &str = "_anime";

/// Base color of a status ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallTone {
    Red,
    Yellow,
    Blue,
    Grey,
    Disabled,
    Aborted,
    #[serde(rename = "nobuilt")]
    NotBuilt,
}

impl BallTone {
    pub const ALL: [BallTone; 7] = [
        BallTone::Red,
        BallTone::Yellow,
        BallTone::Blue,
        BallTone::Grey,
        BallTone::Disabled,
        BallTone::Aborted,
        BallTone::NotBuilt,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            BallTone::Red => "red",
            BallTone::Yellow => "yellow",
            BallTone::Blue => "blue",
            BallTone::Grey => "grey",
            BallTone::Disabled => "disabled",
            BallTone::Aborted => "aborted",
            BallTone::NotBuilt => "nobuilt",
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            BallTone::Red => "ball.failed",
            BallTone::Yellow => "ball.unstable",
            BallTone::Blue => "ball.success",
            BallTone::Grey => "ball.pending",
            BallTone::Disabled => "ball.disabled",
            BallTone::Aborted => "ball.aborted",
            BallTone::NotBuilt => "ball.not_built",
        }
    }

    /// CSS color used when the ball is drawn rather than loaded as an image.
    pub fn html_color(&self) -> &'static str {
        match self {
            BallTone::Red => "#EF2929",
            BallTone::Yellow => "#FCE94F",
            BallTone::Blue => "#729FCF",
            _ => "#ABABAB",
        }
    }
}

/// A status ball, optionally animated while a build is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BallColor {
    pub tone: BallTone,
    pub animated: bool,
}

impl BallColor {
    pub fn new(tone: BallTone) -> Self {
        Self {
            tone,
            animated: false,
        }
    }

    /// Animated form of this ball.
    pub fn anime(self) -> Self {
        Self {
            animated: true,
            ..self
        }
    }

    /// Still form of this ball.
    pub fn no_anime(self) -> Self {
        Self {
            animated: false,
            ..self
        }
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Image file name: `red.png`, or `red_anime.gif` when animated.
    pub fn image(&self) -> String {
        if self.animated {
            format!("{}{ANIME_SUFFIX}.gif", self.tone.token())
        } else {
            format!("{}.png", self.tone.token())
        }
    }

    pub fn description(&self) -> Localizable {
        if self.animated {
            Localizable::new("ball.in_progress")
        } else {
            Localizable::new(self.tone.message_key())
        }
    }

    pub fn to_status_icon(&self) -> StatusIcon {
        StatusIcon::stock(self.image(), self.description())
    }
}

impl fmt::Display for BallColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tone.token())?;
        if self.animated {
            f.write_str(ANIME_SUFFIX)?;
        }
        Ok(())
    }
}

impl FromStr for BallColor {
    type Err = IconError;

    /// Parses `red`, `RED`, `red_anime`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (base, animated) = match lower.strip_suffix(ANIME_SUFFIX) {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };
        let tone = BallTone::ALL
            .into_iter()
            .find(|tone| tone.token() == base)
            .ok_or_else(|| IconError::UnknownBallColor(s.to_string()))?;
        Ok(BallColor { tone, animated })
    }
}

impl From<BallTone> for BallColor {
    fn from(tone: BallTone) -> Self {
        BallColor::new(tone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::RequestContext;
    use crate::l10n::{Locale, MessageBundle};

    #[test]
    fn test_images() {
        let red = BallColor::new(BallTone::Red);
        assert_eq!(red.image(), "red.png");
        assert_eq!(red.anime().image(), "red_anime.gif");
        assert_eq!(red.anime().no_anime(), red);
    }

    #[test]
    fn test_parse_round_trips_display() {
        for tone in BallTone::ALL {
            for ball in [BallColor::new(tone), BallColor::new(tone).anime()] {
                assert_eq!(ball.to_string().parse::<BallColor>().unwrap(), ball);
            }
        }
        assert_eq!("BLUE_ANIME".parse::<BallColor>().unwrap(), BallColor::new(BallTone::Blue).anime());
        assert!(matches!("purple".parse::<BallColor>(), Err(IconError::UnknownBallColor(_))));
    }

    #[test]
    fn test_status_icon_from_ball() {
        let bundle = MessageBundle::builtin();
        let icon = BallColor::new(BallTone::Yellow).to_status_icon();
        let request = RequestContext::new("/ci", "/static/0011");
        assert_eq!(
            icon.image_of(Some(&request), "32x32").unwrap().as_deref(),
            Some("/ci/static/0011/images/32x32/yellow.png")
        );
        assert_eq!(icon.description(&bundle, &Locale::root()), "Unstable");
        assert_eq!(icon.description(&bundle, &"de".parse().unwrap()), "Instabil");

        let running = BallColor::new(BallTone::Yellow).anime().to_status_icon();
        assert_eq!(running.description(&bundle, &"ja".parse().unwrap()), "実行中");
    }

    #[test]
    fn test_html_color() {
        assert_eq!(BallTone::Red.html_color(), "#EF2929");
        assert_eq!(BallTone::Aborted.html_color(), "#ABABAB");
    }
}
