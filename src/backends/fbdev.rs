// Linux framebuffer device backend (/dev/fbN)

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr;

use crate::core::PixelBuffer;
use crate::error::{FbgError, Result};
use crate::traits::{Backend, Presentation};

const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;
const FBIOPAN_DISPLAY: libc::c_ulong = 0x4606;

#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// `struct fb_var_screeninfo` from linux/fb.h
#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// `struct fb_fix_screeninfo` from linux/fb.h
#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    type_: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

/// Options for opening a framebuffer device
#[derive(Debug, Clone, Copy, Default)]
pub struct FbDevOptions {
    /// Present into alternating halves of the virtual screen and pan between them
    pub page_flip: bool,
    /// Write blue first even if the device bitfields say otherwise
    pub force_bgr: bool,
}

/// Framebuffer device mapped into memory
///
/// Frames are converted from the context's RGB layout to the device pixel
/// format row by row on every present.
pub struct FbDev {
    file: File,
    vinfo: FbVarScreeninfo,
    finfo: FbFixScreeninfo,
    map: *mut u8,
    map_len: usize,
    bgr: bool,
    page_flip: bool,
    page: u32,
}

/// Issue a framebuffer ioctl that reads or writes `arg`
///
/// # Safety
/// `T` must be the struct the kernel expects for `request`.
unsafe fn fb_ioctl<T>(file: &File, request: libc::c_ulong, arg: &mut T) -> io::Result<()> {
    if libc::ioctl(file.as_raw_fd(), request as _, arg as *mut T) == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

impl FbDev {
    /// Open `/dev/fb0`
    pub fn open_default() -> Result<Self> {
        Self::open("/dev/fb0", FbDevOptions::default())
    }

    pub fn open(path: impl AsRef<Path>, options: FbDevOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let mut vinfo = FbVarScreeninfo::default();
        let mut finfo = FbFixScreeninfo::default();
        // SAFETY: both structs mirror the kernel layouts for these requests.
        unsafe {
            fb_ioctl(&file, FBIOGET_VSCREENINFO, &mut vinfo)?;
            fb_ioctl(&file, FBIOGET_FSCREENINFO, &mut finfo)?;
        }

        if !matches!(vinfo.bits_per_pixel, 16 | 24 | 32) {
            return Err(FbgError::Backend(format!(
                "{}: unsupported depth {} bpp",
                path.display(),
                vinfo.bits_per_pixel
            )));
        }

        let map_len = finfo.smem_len as usize;
        if map_len == 0 {
            return Err(FbgError::Backend(format!("{}: no video memory", path.display())));
        }

        // SAFETY: fresh shared mapping of the device; checked against
        // MAP_FAILED before use and released in `teardown`.
        let map = unsafe {
            libc::mmap(
                ptr::null_mut(),
                map_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };
        if map == libc::MAP_FAILED {
            return Err(io::Error::last_os_error().into());
        }

        let page_size = finfo.line_length as usize * vinfo.yres as usize;
        let page_flip = if options.page_flip && (vinfo.yres_virtual < vinfo.yres * 2 || map_len < page_size * 2) {
            log::warn!("{}: virtual screen too small for page flipping", path.display());
            false
        } else {
            options.page_flip
        };

        let bgr = options.force_bgr || vinfo.blue.offset < vinfo.red.offset;

        log::info!(
            "opened {} ({}x{}, {} bpp, line {} bytes{}{})",
            path.display(),
            vinfo.xres,
            vinfo.yres,
            vinfo.bits_per_pixel,
            finfo.line_length,
            if bgr { ", bgr" } else { "" },
            if page_flip { ", page flipping" } else { "" }
        );

        Ok(Self {
            file,
            vinfo,
            finfo,
            map: map as *mut u8,
            map_len,
            bgr,
            page_flip,
            page: 0,
        })
    }

    /// Visible resolution
    pub fn dimensions(&self) -> (u32, u32) {
        (self.vinfo.xres, self.vinfo.yres)
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.vinfo.bits_per_pixel
    }

    /// True when the device stores blue in the lowest byte
    pub fn is_bgr(&self) -> bool {
        self.bgr
    }

    fn memory(&mut self) -> &mut [u8] {
        if self.map.is_null() {
            return &mut [];
        }
        // SAFETY: `map` points to `map_len` mapped bytes until teardown
        // nulls it, and `&mut self` keeps the slice unique.
        unsafe { std::slice::from_raw_parts_mut(self.map, self.map_len) }
    }

    fn write_pixel(dst: &mut [u8], src: &[u8], bgr: bool) {
        let (r, g, b) = (src[0], src[1], src[2]);
        let (first, third) = if bgr { (b, r) } else { (r, b) };
        match dst.len() {
            2 => {
                let packed = ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3);
                dst.copy_from_slice(&packed.to_le_bytes());
            }
            3 => dst.copy_from_slice(&[first, g, third]),
            _ => {
                dst[..3].copy_from_slice(&[first, g, third]);
                dst[3] = 0;
            }
        }
    }
}

impl Backend for FbDev {
    fn name(&self) -> &str {
        "fbdev"
    }

    fn present(&mut self, back: &PixelBuffer) -> Result<Presentation> {
        let line = self.finfo.line_length as usize;
        let bytes_pp = (self.vinfo.bits_per_pixel / 8) as usize;
        let rows = back.height().min(self.vinfo.yres);
        let cols = back.width().min(self.vinfo.xres) as usize;
        let comps = back.components();
        let bgr = self.bgr;

        let page = if self.page_flip { 1 - self.page } else { 0 };
        let base = (page * self.vinfo.yres) as usize * line + self.vinfo.xoffset as usize * bytes_pp;

        // RGB-ordered 32 bpp rows have the buffer's own layout
        let direct = comps == bytes_pp && bytes_pp == 4 && !bgr;

        let memory = self.memory();
        for y in 0..rows {
            let start = base + y as usize * line;
            let Some(dst_row) = memory.get_mut(start..start + cols * bytes_pp) else {
                break;
            };
            let src_row = &back.row(y)[..cols * comps];

            if direct {
                dst_row.copy_from_slice(src_row);
                continue;
            }
            for (dst, src) in dst_row
                .chunks_exact_mut(bytes_pp)
                .zip(src_row.chunks_exact(comps))
            {
                Self::write_pixel(dst, src, bgr);
            }
        }

        if self.page_flip {
            self.vinfo.yoffset = page * self.vinfo.yres;
            // SAFETY: vinfo was filled by FBIOGET_VSCREENINFO on this device.
            unsafe { fb_ioctl(&self.file, FBIOPAN_DISPLAY, &mut self.vinfo)? };
            self.page = page;
        }

        Ok(Presentation::Presented)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        log::debug!(
            "fbdev mode is fixed at {}x{}, ignoring {}x{}",
            self.vinfo.xres,
            self.vinfo.yres,
            width,
            height
        );
        Ok(())
    }

    fn teardown(&mut self) {
        if self.map.is_null() {
            return;
        }
        // SAFETY: `map`/`map_len` come from the successful mmap in `open`
        // and are nulled right after, so the region is unmapped once.
        unsafe {
            libc::munmap(self.map as *mut libc::c_void, self.map_len);
        }
        self.map = ptr::null_mut();
        log::debug!("fbdev unmapped");
    }
}

impl Drop for FbDev {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screeninfo_layouts_match_kernel_sizes() {
        assert_eq!(std::mem::size_of::<FbVarScreeninfo>(), 160);
        assert_eq!(std::mem::size_of::<FbBitfield>(), 12);
    }

    #[test]
    fn pixel_conversion_per_depth() {
        let src = [0xF8, 0xFC, 0x08];

        let mut rgb565 = [0u8; 2];
        FbDev::write_pixel(&mut rgb565, &src, false);
        assert_eq!(u16::from_le_bytes(rgb565), 0xFFE1);

        let mut bgra = [9u8; 4];
        FbDev::write_pixel(&mut bgra, &src, true);
        assert_eq!(bgra, [0x08, 0xFC, 0xF8, 0]);

        let mut rgb = [0u8; 3];
        FbDev::write_pixel(&mut rgb, &src, false);
        assert_eq!(rgb, [0xF8, 0xFC, 0x08]);
    }

    #[test]
    fn missing_device_is_an_io_error() {
        let result = FbDev::open("/nonexistent/fb9", FbDevOptions::default());
        assert!(matches!(result, Err(FbgError::Io(_))));
    }
}
