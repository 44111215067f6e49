//! 已解析配置对象
//!
//! 容器只消费已经解析好的配置对象，配置文件的读写不在这里处理

use crate::errors::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::info;

/// 配置节
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSection {
    /// 配置数据
    pub data: BTreeMap<String, serde_json::Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已解析的 JSON 对象创建配置节
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        match value {
            serde_json::Value::Object(map) => Ok(Self {
                data: map.into_iter().collect(),
            }),
            other => Err(ConfigError::ValidationError {
                message: format!("配置节必须是 JSON 对象, 实际为: {other}"),
            }),
        }
    }

    /// 插入配置项，空值会被拒绝
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), ConfigError> {
        let key = key.into();
        if value.is_null() {
            return Err(ConfigError::NullValue { key });
        }
        self.data.insert(key, value);
        Ok(())
    }

    /// 移除配置项
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// 获取子配置节
    pub fn section(&self, key: &str) -> Result<Self, ConfigError> {
        let value = self.get(key).ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
        })?;
        Self::from_value(value.clone())
    }

    /// 配置项数量
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否没有任何配置项
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 绑定到具体类型
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let value = serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        Ok(serde_json::from_value(value)?)
    }
}

/// 配置对象构建器
///
/// 以键值对方式累积设置，再一次性绑定为强类型配置对象。
/// 构建出的对象通常以实例形式固定到容器中。
#[derive(Debug)]
pub struct ConfigurationBuilder<T> {
    section: ConfigSection,
    _target: PhantomData<fn() -> T>,
}

impl<T> ConfigurationBuilder<T>
where
    T: DeserializeOwned,
{
    /// 创建空的构建器
    pub fn new() -> Self {
        Self {
            section: ConfigSection::new(),
            _target: PhantomData,
        }
    }

    /// 以已解析的配置节为起点
    pub fn from_section(section: ConfigSection) -> Self {
        Self {
            section,
            _target: PhantomData,
        }
    }

    /// 添加或覆盖一个设置项
    ///
    /// 值为 `null` 时返回错误，构建器保持不变。
    pub fn add_settings(
        mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<Self, ConfigError> {
        let value = serde_json::to_value(value)?;
        self.section.insert(key, value)?;
        Ok(self)
    }

    /// 移除一个设置项，不存在时忽略
    pub fn remove_settings(mut self, key: &str) -> Self {
        self.section.remove(key);
        self
    }

    /// 当前累积的配置节
    pub fn section(&self) -> &ConfigSection {
        &self.section
    }

    /// 绑定为强类型配置对象
    pub fn build(&self) -> Result<T, ConfigError> {
        self.section.bind()
    }

    /// 输出当前所有设置项
    pub fn display(&self) {
        for (key, value) in &self.section.data {
            info!("{}: {}", key, value);
        }
    }
}

impl<T> Default for ConfigurationBuilder<T>
where
    T: DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}
