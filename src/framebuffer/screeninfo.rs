//! Linux fbdev 屏幕信息（`linux/fb.h`）
//!
//! 只声明本程序用到的两个 ioctl 及其结构体，字段布局与内核头文件保持一致。

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;

/// 颜色分量在像素中的位置。
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

/// `struct fb_var_screeninfo`：可变的显示模式参数。
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct VarScreenInfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

/// `struct fb_fix_screeninfo`：显示模式无关的固定参数。
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FixScreenInfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

impl FixScreenInfo {
    /// 驱动名称（去掉结尾的 NUL）。
    pub fn id(&self) -> String {
        let end = self.id.iter().position(|&b| b == 0).unwrap_or(self.id.len());
        String::from_utf8_lossy(&self.id[..end]).into_owned()
    }
}

fn ioctl_read<T: Default>(file: &File, request: libc::c_ulong) -> io::Result<T> {
    let mut info = T::default();
    // SAFETY: fd 在 file 存活期间有效；T 为与内核布局一致的 repr(C) 结构体，
    // 内核只向该指针写入 size_of::<T>() 字节。
    let ret = unsafe { libc::ioctl(file.as_raw_fd(), request as _, &mut info as *mut T) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(info)
}

pub fn read_var(file: &File) -> io::Result<VarScreenInfo> {
    ioctl_read(file, FBIOGET_VSCREENINFO)
}

pub fn read_fix(file: &File) -> io::Result<FixScreenInfo> {
    ioctl_read(file, FBIOGET_FSCREENINFO)
}
