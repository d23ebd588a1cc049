use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::image_pipeline::ViewerConfig;

/// 从 JSON 文件读取查看器配置，缺省字段使用默认值。
pub fn load_viewer_config(path: &Path) -> Result<ViewerConfig, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Settings(format!("读取配置文件 {} 失败: {}", path.display(), e)))?;

    let config = serde_json::from_str::<ViewerConfig>(&content)
        .map_err(|e| AppError::Settings(format!("解析配置文件失败: {}", e)))?;

    log::debug!("已加载配置文件 {}: {:?}", path.display(), config);
    Ok(config)
}

/// 把配置写回 JSON 文件（格式化输出）。
pub fn save_viewer_config(path: &Path, config: &ViewerConfig) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Settings(format!("序列化配置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}
