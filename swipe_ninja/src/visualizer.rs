//! Software-rendered playfield using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        ●            ●                     │
//! │                 SLICED!                   │  playfield (width × height)
//! │   ●                          ◉ fingertip  │
//! │                                           │
//! ├──────────────────────────────────────────┤
//! │ status bar / key legend                   │
//! └──────────────────────────────────────────┘
//! ```

use std::time::Duration;

use fruit_field::{Fruit, Point};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use snafu::ResultExt;

use crate::error::{Result, WindowSnafu};
use crate::gesture::SimInput;
use crate::markers::SliceMarkers;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:        usize = 30;
const BG_COLOR:        u32   = 0xFF1A1A2E;
const STATUS_BG:       u32   = 0xFF0F3460;
const FRUIT_COLOR:     u32   = 0xFF00FF00;
const FRUIT_RIM:       u32   = 0xFF007A00;
const TIP_COLOR:       u32   = 0xFFFF00FF;
const TIP_SWIPE_COLOR: u32   = 0xFFFFFFFF;
const TIP_RADIUS:      i32   = 10;
const SLICED_COLOR:    u32   = 0xFFFF3030;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
}

impl Visualizer {
    /// Open a window with a `width × height` playfield plus the status bar.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let total_h = height + STATUS_H;
        let mut window = Window::new(
            "Swipe Ninja",
            width, total_h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).context(WindowSnafu)?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * total_h],
            width,
            height,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// This frame's pointer, or [`SimInput::Quit`] once the window is
    /// closed or `Q` is pressed.
    pub fn poll_input(&mut self) -> SimInput {
        if !self.window.is_open() || self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            return SimInput::Quit;
        }
        SimInput::Pointer {
            pos:     self.window.get_mouse_pos(MouseMode::Discard),
            pressed: self.window.get_mouse_down(MouseButton::Left),
        }
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        fruits:    &[Fruit],
        markers:   &SliceMarkers,
        fingertip: Option<Point>,
        swipe:     bool,
        status:    &str,
    ) {
        self.buf.fill(BG_COLOR);

        for fruit in fruits {
            let (cx, cy, r) = (fruit.position.x as i32, fruit.position.y as i32, fruit.radius as i32);
            self.fill_circle(cx, cy, r, FRUIT_RIM);
            self.fill_circle(cx, cy, (r - 2).max(1), FRUIT_COLOR);
        }

        if let Some(tip) = fingertip {
            let color = if swipe { TIP_SWIPE_COLOR } else { TIP_COLOR };
            self.fill_circle(tip.x as i32, tip.y as i32, TIP_RADIUS, color);
        }

        for m in &markers.entries {
            let color = blend(BG_COLOR, SLICED_COLOR, 0.3 + 0.7 * m.fade());
            let x = (m.position.x as i32 - 20).max(0) as usize;
            let y = m.position.y.max(0.0) as usize;
            self.draw_label_scaled("SLICED!", x, y, 2, color);
        }

        // ── Status bar ────────────────────────────────────────────────────
        let sy = self.height;
        self.fill_rect(0, sy, self.width, STATUS_H, STATUS_BG);
        self.draw_label(status, 8, sy + 6, 0xFFEEEEEE);
        self.draw_label("hold left mouse = hand in view   move fast = swipe   Q = quit",
                        8, sy + 18, 0xFF888888);

        let (w, h) = (self.width, self.height + STATUS_H);
        self.window.update_with_buffer(&self.buf, w, h).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn total_h(&self) -> usize { self.height + STATUS_H }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let (width, total_h) = (self.width, self.total_h());
        for row in y..(y+h).min(total_h) {
            for col in x..(x+w).min(width) {
                self.buf[row * width + col] = color;
            }
        }
    }

    /// Clipped to the playfield so circles never paint over the status bar.
    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        let (w, h) = (self.width as i32, self.height as i32);
        for dy in -r..=r {
            let y = cy + dy;
            if y < 0 || y >= h { continue; }
            let half = ((r * r - dy * dy) as f32).sqrt() as i32;
            let x0 = (cx - half).max(0);
            let x1 = (cx + half).min(w - 1);
            for x in x0..=x1 {
                self.buf[y as usize * self.width + x as usize] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.total_h() {
            self.buf[y * self.width + x] = color;
        }
    }

    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_label_scaled(text, x, y, 1, color);
    }

    /// Minimal bitmap font — 3×5 characters, each pixel drawn as a
    /// `scale × scale` block.
    fn draw_label_scaled(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(cx + col * scale + sx, y + row * scale + sy, color);
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.width { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}
