use serde::Deserialize;

use crate::infra::config::{ApiConfig, AppConfig, ChatConfig, ChatMode, ListConfig, LogConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub api: Option<FileApiConfig>,
    pub list: Option<FileListConfig>,
    pub chat: Option<FileChatConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(api) = self.api {
            api.merge_into(&mut config.api);
        }

        if let Some(list) = self.list {
            list.merge_into(&mut config.list);
        }

        if let Some(chat) = self.chat {
            chat.merge_into(&mut config.chat);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileApiConfig {
    pub base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl FileApiConfig {
    fn merge_into(self, config: &mut ApiConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileListConfig {
    pub per_page: Option<u32>,
    pub search_debounce_ms: Option<u64>,
}

impl FileListConfig {
    fn merge_into(self, config: &mut ListConfig) {
        if let Some(per_page) = self.per_page {
            config.per_page = per_page;
        }

        if let Some(debounce_ms) = self.search_debounce_ms {
            config.search_debounce_ms = debounce_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileChatConfig {
    pub mode: Option<ChatMode>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

impl FileChatConfig {
    fn merge_into(self, config: &mut ChatConfig) {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }

        if self.model.is_some() {
            config.model = self.model;
        }

        if self.max_tokens.is_some() {
            config.max_tokens = self.max_tokens;
        }
    }
}
