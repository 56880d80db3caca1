//! Font metrics for the standard PDF Type1 fonts
//!
//! Advance widths come from the Adobe font metrics files. Vertical extents
//! are per glyph class (x-height letters, ascenders, descenders, capitals)
//! using the font-wide AFM values, which is close enough for placing text
//! against an anchor. Symbol and ZapfDingbats glyphs all measure from the
//! baseline to the cap height.

use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Measures the ink box of a string set at a given size.
pub trait TextMeasure {
    /// Bounding box of `text` at `font_size`, relative to the start of the
    /// baseline. Text with no visible glyphs measures as [`Rect::ZERO`].
    fn bounds(&self, text: &str, font_size: f32) -> Rect;
}

/// The fourteen fonts every PDF viewer provides without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

struct VerticalMetrics {
    cap_height: i16,
    x_height: i16,
    ascender: i16,
    descender: i16,
    /// Top of `t`, which sits between the x-height and the ascender.
    t_height: i16,
}

const HELVETICA_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 718,
    x_height: 523,
    ascender: 718,
    descender: -207,
    t_height: 669,
};

const HELVETICA_BOLD_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 718,
    x_height: 532,
    ascender: 718,
    descender: -207,
    t_height: 676,
};

const TIMES_ROMAN_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 662,
    x_height: 450,
    ascender: 683,
    descender: -217,
    t_height: 579,
};

const TIMES_BOLD_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 676,
    x_height: 461,
    ascender: 683,
    descender: -217,
    t_height: 616,
};

const TIMES_ITALIC_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 653,
    x_height: 441,
    ascender: 683,
    descender: -217,
    t_height: 546,
};

const TIMES_BOLD_ITALIC_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 669,
    x_height: 462,
    ascender: 683,
    descender: -217,
    t_height: 594,
};

const COURIER_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 562,
    x_height: 426,
    ascender: 629,
    descender: -157,
    t_height: 561,
};

// Neither symbolic AFM gives a cap height; these are the heights of
// Alpha and of the typical dingbat.
const SYMBOL_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 673,
    x_height: 500,
    ascender: 673,
    descender: -220,
    t_height: 673,
};

const ZAPF_DINGBATS_VERTICAL: VerticalMetrics = VerticalMetrics {
    cap_height: 692,
    x_height: 692,
    ascender: 692,
    descender: -143,
    t_height: 692,
};

const COURIER_ADVANCE: u16 = 600;

// Helvetica (and Helvetica-Oblique) advance widths for WinAnsi codes 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

// Helvetica-Bold (and Helvetica-BoldOblique), codes 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

// Times-Roman, codes 32..=126.
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // ' '../
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0..9
    278, 278, 564, 564, 564, 444, 921, // :..@
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, // A..M
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, // N..Z
    333, 278, 333, 469, 500, 333, // [..`
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, // a..m
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, // n..z
    480, 200, 480, 541, // {..~
];

// Times-Bold, codes 32..=126.
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278, // ' '../
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0..9
    333, 333, 570, 570, 570, 500, 930, // :..@
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, // A..M
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, // N..Z
    333, 278, 333, 581, 500, 333, // [..`
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, // a..m
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, // n..z
    394, 220, 394, 520, // {..~
];

// Times-Italic, codes 32..=126.
const TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278, // ' '../
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0..9
    333, 333, 675, 675, 675, 500, 920, // :..@
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, // A..M
    667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, // N..Z
    389, 278, 389, 422, 500, 333, // [..`
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, // a..m
    500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, // n..z
    400, 275, 400, 541, // {..~
];

// Times-BoldItalic, codes 32..=126.
const TIMES_BOLD_ITALIC_WIDTHS: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278, // ' '../
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0..9
    333, 333, 570, 570, 570, 500, 832, // :..@
    667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, // A..M
    722, 722, 611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, // N..Z
    333, 278, 333, 570, 500, 333, // [..`
    500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, // a..m
    556, 500, 500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, // n..z
    348, 220, 348, 570, // {..~
];

// Symbol, built-in encoding, codes 32..=126.
const SYMBOL_WIDTHS: [u16; 95] = [
    250, 333, 713, 500, 549, 833, 778, 439, 333, 333, 500, 549, 250, 549, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 549, 549, 549, 444,
    549, 722, 667, 722, 612, 611, 763, 603, 722, 333, 631, 722, 686, 889, 722, 722,
    768, 741, 556, 592, 611, 690, 439, 768, 645, 795, 611, 333, 863, 333, 658, 500,
    500, 631, 549, 549, 494, 439, 521, 411, 603, 329, 603, 549, 549, 576, 521, 549,
    549, 521, 549, 603, 439, 576, 713, 686, 493, 686, 494, 480, 200, 480, 549,
];

// ZapfDingbats, built-in encoding, codes 32..=126.
const ZAPF_DINGBATS_WIDTHS: [u16; 95] = [
    278, 974, 961, 974, 980, 719, 789, 790, 791, 690, 960, 939, 549, 855, 911, 933,
    911, 945, 974, 755, 846, 762, 761, 571, 677, 763, 760, 759, 754, 494, 552, 537,
    577, 692, 786, 788, 788, 790, 793, 794, 816, 823, 789, 841, 823, 833, 816, 831,
    923, 744, 723, 749, 790, 792, 695, 776, 768, 792, 759, 707, 708, 682, 701, 826,
    815, 789, 789, 707, 687, 696, 689, 786, 787, 713, 791, 785, 791, 873, 761, 762,
    762, 759, 759, 892, 892, 788, 784, 438, 138, 277, 415, 392, 392, 668, 668,
];

/// How a font advances: one width for everything, or a table for the
/// printable ASCII range with a fallback for the rest.
enum Advance {
    Fixed(u16),
    Table(&'static [u16; 95], u16),
}

impl StandardFont {
    pub const ALL: [StandardFont; 14] = [
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::TimesRoman,
        Self::TimesBold,
        Self::TimesItalic,
        Self::TimesBoldItalic,
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
        Self::Symbol,
        Self::ZapfDingbats,
    ];

    /// Looks up a PostScript font name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|font| font.base_name() == name)
    }

    pub fn by_name(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| Error::unknown_font(name))
    }

    pub const fn base_name(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
            Self::Symbol => "Symbol",
            Self::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Symbol and ZapfDingbats use their own built-in encodings.
    pub const fn is_symbolic(self) -> bool {
        matches!(self, Self::Symbol | Self::ZapfDingbats)
    }

    const fn advance(self) -> Advance {
        match self {
            Self::Helvetica | Self::HelveticaOblique => Advance::Table(&HELVETICA_WIDTHS, 556),
            Self::HelveticaBold | Self::HelveticaBoldOblique => {
                Advance::Table(&HELVETICA_BOLD_WIDTHS, 556)
            }
            Self::TimesRoman => Advance::Table(&TIMES_ROMAN_WIDTHS, 500),
            Self::TimesBold => Advance::Table(&TIMES_BOLD_WIDTHS, 500),
            Self::TimesItalic => Advance::Table(&TIMES_ITALIC_WIDTHS, 500),
            Self::TimesBoldItalic => Advance::Table(&TIMES_BOLD_ITALIC_WIDTHS, 500),
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                Advance::Fixed(COURIER_ADVANCE)
            }
            Self::Symbol => Advance::Table(&SYMBOL_WIDTHS, 500),
            Self::ZapfDingbats => Advance::Table(&ZAPF_DINGBATS_WIDTHS, 788),
        }
    }

    const fn vertical(self) -> &'static VerticalMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &HELVETICA_VERTICAL,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &HELVETICA_BOLD_VERTICAL,
            Self::TimesRoman => &TIMES_ROMAN_VERTICAL,
            Self::TimesBold => &TIMES_BOLD_VERTICAL,
            Self::TimesItalic => &TIMES_ITALIC_VERTICAL,
            Self::TimesBoldItalic => &TIMES_BOLD_ITALIC_VERTICAL,
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                &COURIER_VERTICAL
            }
            Self::Symbol => &SYMBOL_VERTICAL,
            Self::ZapfDingbats => &ZAPF_DINGBATS_VERTICAL,
        }
    }

    /// Advance width of one character in thousandths of an em.
    pub fn char_width(self, c: char) -> u16 {
        match self.advance() {
            Advance::Fixed(width) => width,
            Advance::Table(widths, fallback) => match u32::from(c) {
                code @ 32..=126 => widths[(code - 32) as usize],
                _ => fallback,
            },
        }
    }

    /// Width of `text` in points at `font_size`.
    pub fn string_width(self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * font_size / 1000.0
    }

    /// Vertical ink extent `(bottom, top)` of one character in font units.
    fn glyph_extent(self, c: char) -> Option<(i16, i16)> {
        let v = self.vertical();
        if c.is_whitespace() || c.is_control() {
            return None;
        }
        if self.is_symbolic() {
            return Some((0, v.cap_height));
        }
        let extent = match c {
            'g' | 'p' | 'q' | 'y' => (v.descender, v.x_height),
            'j' => (v.descender, v.ascender),
            't' => (0, v.t_height),
            'b' | 'd' | 'f' | 'h' | 'i' | 'k' | 'l' => (0, v.ascender),
            c if c.is_ascii_lowercase() => (0, v.x_height),
            c if c.is_ascii_uppercase() || c.is_ascii_digit() => (0, v.cap_height),
            '(' | ')' | '[' | ']' | '{' | '}' | '|' => (v.descender, v.ascender),
            ',' | ';' => (v.descender / 2, v.x_height / 5),
            '.' | ':' => (0, v.x_height / 5),
            '-' | '~' | '=' | '+' => (v.x_height / 3, 2 * v.x_height / 3),
            '_' => (v.descender, v.descender / 2),
            _ => (0, v.cap_height),
        };
        Some(extent)
    }
}

impl TextMeasure for StandardFont {
    fn bounds(&self, text: &str, font_size: f32) -> Rect {
        let extents = text.chars().filter_map(|c| self.glyph_extent(c));
        let (bottom, top) = extents.fold((i16::MAX, i16::MIN), |(lo, hi), (b, t)| {
            (lo.min(b), hi.max(t))
        });
        if bottom > top {
            return Rect::ZERO;
        }
        let scale = font_size / 1000.0;
        Rect::new(
            0.0,
            f32::from(bottom) * scale,
            self.string_width(text, font_size),
            f32::from(top) * scale,
        )
    }
}
