//! Start-up heading: ASCII art plus a random tagline.

use owo_colors::OwoColorize;
use rand::seq::SliceRandom;
use rand::Rng;

const ASCII_ART: &str = r" _____  _____ ______  _
|  _  |/  __ \| ___ \| |
| | | || /  \/| |_/ /| |_  _   _  _ __    ___  ___
| | | || |    |    / | __|| | | || '_ \  / _ \/ __|
\ \_/ /| \__/\| |\ \ | |_ | |_| || | | ||  __/\__ \
 \___/  \____/\_| \_| \__| \__,_||_| |_| \___||___/";

const ART_WIDTH: usize = 51;

pub const TAGLINES: [&str; 4] = [
    "Find your new favourite artist with OCRtunes.",
    "If you can't find it on OCRtunes, it doesn't exist.",
    "Music to your ears",
    "Your perfect playlist, every time.",
];

/// The tagline centred under the art.
pub fn centred_tagline(tagline: &str) -> String {
    let padding = ART_WIDTH.saturating_sub(tagline.chars().count()) / 2;
    format!("{}{tagline}", " ".repeat(padding))
}

pub fn pick_tagline<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TAGLINES.choose(rng).copied().unwrap_or(TAGLINES[0])
}

pub fn print_heading() {
    let tagline = pick_tagline(&mut rand::thread_rng());
    println!("{}", ASCII_ART.blue().bold());
    println!("{}", centred_tagline(tagline).cyan());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tagline_is_centred() {
        let line = centred_tagline("Music to your ears");
        assert_eq!(line.len() - line.trim_start().len(), (ART_WIDTH - 18) / 2);
    }

    #[test]
    fn test_pick_tagline_is_known() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(TAGLINES.contains(&pick_tagline(&mut rng)));
    }
}
