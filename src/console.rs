//! # 终端控制模块
//!
//! ## 设计思路
//!
//! 图片直接绘制在 framebuffer 上，与文本终端共用同一块屏幕：
//! - 运行期间关闭回显与行缓冲，避免按键字符覆盖画面
//! - 退出时（正常结束、panic 或致命信号）恢复原终端设置
//!
//! `ConsoleGuard` 采用 RAII 模式：构造时切换终端模式，`Drop` 时自动恢复。
//! 信号处理函数无法访问守卫本身，因此原始设置额外保存在进程级 `OnceLock` 中。

use std::io::{self, Write};
use std::sync::OnceLock;

use crate::error::AppError;

/// 清屏并把光标移到左上角。
pub const CLEAR_SEQUENCE: &[u8] = b"\x1b[H\x1b[J";

/// 进入修改前的终端设置，供信号处理函数恢复。
static SAVED_TERMIOS: OnceLock<libc::termios> = OnceLock::new();

/// 需要恢复终端后退出的信号。
const EXIT_SIGNALS: [libc::c_int; 6] = [
    libc::SIGHUP,
    libc::SIGINT,
    libc::SIGQUIT,
    libc::SIGSEGV,
    libc::SIGTERM,
    libc::SIGABRT,
];

/// 写出清屏序列。
pub fn clear_screen<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    out.write_all(CLEAR_SEQUENCE)?;
    out.flush()
}

/// 终端模式守卫。
pub struct ConsoleGuard {
    saved: libc::termios,
}

impl ConsoleGuard {
    /// 关闭标准输入的回显与规范模式。
    ///
    /// 标准输入不是终端时返回错误，调用方可以选择在无守卫状态下继续运行。
    pub fn setup() -> Result<Self, AppError> {
        // SAFETY: termios 是纯 C 结构体，全零是合法初始值，随后由 tcgetattr 填充。
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };

        // SAFETY: fd 0 在进程生命周期内有效，指针指向本地变量。
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &mut saved) } != 0 {
            return Err(AppError::Console(format!(
                "读取终端设置失败: {}",
                io::Error::last_os_error()
            )));
        }

        let mut raw = saved;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON);

        // SAFETY: 同上，raw 为完整初始化的 termios。
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw) } != 0 {
            return Err(AppError::Console(format!(
                "设置终端模式失败: {}",
                io::Error::last_os_error()
            )));
        }

        let _ = SAVED_TERMIOS.set(saved);
        log::debug!("终端已切换为无回显模式");
        Ok(Self { saved })
    }
}

impl Drop for ConsoleGuard {
    fn drop(&mut self) {
        // SAFETY: saved 来自成功的 tcgetattr。
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &self.saved) } != 0 {
            log::warn!("恢复终端设置失败: {}", io::Error::last_os_error());
        }
    }
}

extern "C" fn restore_and_exit(signal: libc::c_int) {
    if let Some(saved) = SAVED_TERMIOS.get() {
        // SAFETY: tcsetattr 与 _exit 都是 async-signal-safe 的。
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
        }
    }
    // SAFETY: 立即终止进程，不运行任何析构。
    unsafe { libc::_exit(128 + signal) }
}

/// 注册致命信号处理：恢复终端后以 `128 + signal` 退出。
pub fn install_signal_handlers() -> Result<(), AppError> {
    let handler = restore_and_exit as extern "C" fn(libc::c_int) as libc::sighandler_t;
    for signal in EXIT_SIGNALS {
        // SAFETY: handler 是 extern "C" 函数，仅调用 async-signal-safe 接口。
        if unsafe { libc::signal(signal, handler) } == libc::SIG_ERR {
            return Err(AppError::Console(format!(
                "注册信号 {} 处理失败: {}",
                signal,
                io::Error::last_os_error()
            )));
        }
    }
    Ok(())
}
