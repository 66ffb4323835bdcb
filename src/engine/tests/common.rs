// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use crate::frame::Frame;

/// A uniform mid-gray frame.
pub(crate) fn gray_frame(width: u32, height: u32) -> Frame {
    Frame::filled(width, height, [128, 128, 128]).unwrap()
}

/// A frame with enough structure that warps and sorts visibly move
/// content around.
pub(crate) fn textured_frame(width: u32, height: u32) -> Frame {
    let mut frame = Frame::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            let b = if (x + y) % 2 == 0 { 255 } else { 0 };
            frame.put_pixel(x, y, [r, g, b]);
        }
    }
    frame
}
