//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the precondition marker the external tool checks
//! for before it agrees to run.
//!
//! 此模块提供外部工具在同意运行之前所检查的前置条件标记文件。

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

/// Creates the usage-acceptance marker.
///
/// `touch` must be idempotent: calling it on an existing marker succeeds and
/// leaves the file's contents alone.
///
/// 创建使用许可标记。`touch` 必须是幂等的：对已存在的标记调用会成功，
/// 且不改变文件内容。
pub trait MarkerWriter: Send + Sync {
    fn touch(&self, path: &Path) -> io::Result<()>;
}

impl<M: MarkerWriter + ?Sized> MarkerWriter for std::sync::Arc<M> {
    fn touch(&self, path: &Path) -> io::Result<()> {
        (**self).touch(path)
    }
}

/// Touches the marker on the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMarker;

impl MarkerWriter for FsMarker {
    fn touch(&self, path: &Path) -> io::Result<()> {
        // Append mode creates the file if missing and never truncates it.
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(())
    }
}
