//! 1-bpp framebuffer for monochrome panels
//!
//! Row-major, MSB = leftmost pixel, bit set = white (the convention
//! SSD16xx RAM uses). Implements `embedded_graphics::DrawTarget` so any
//! embedded-graphics primitive can render into it.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

pub struct Framebuffer {
    width: u16,
    height: u16,
    row_bytes: usize,
    buf: Vec<u8>,
    dirty: bool,
}

impl Framebuffer {
    /// All-white buffer. Rows are padded to whole bytes.
    pub fn new(width: u16, height: u16) -> Self {
        let row_bytes = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            row_bytes,
            buf: vec![0xFF; row_bytes * height as usize],
            dirty: false,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear_white(&mut self) {
        self.buf.fill(0xFF);
        self.dirty = true;
    }

    pub fn clear_black(&mut self) {
        self.buf.fill(0x00);
        self.dirty = true;
    }

    /// Modified since the last `mark_clean`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    /// `true` = black. Out-of-range reads as white.
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (index, bit) = self.locate(x, y);
        self.buf[index] & bit == 0
    }

    fn locate(&self, x: u16, y: u16) -> (usize, u8) {
        let index = y as usize * self.row_bytes + x as usize / 8;
        (index, 0x80 >> (x % 8))
    }

    fn set_pixel(&mut self, x: u16, y: u16, on: bool) {
        let (index, bit) = self.locate(x, y);
        if on {
            // "On" = black = clear bit
            self.buf[index] &= !bit;
        } else {
            self.buf[index] |= bit;
        }
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
                continue;
            }
            self.set_pixel(x as u16, y as u16, color.is_on());
            self.dirty = true;
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}
