//! Display language and the UI strings that depend on it.

use std::fmt;
use std::str::FromStr;

use crate::apps::AppId;
use crate::error::ParseLocaleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    En,
    #[default]
    Cn,
}

impl Locale {
    pub fn toggled(self) -> Self {
        match self {
            Locale::En => Locale::Cn,
            Locale::Cn => Locale::En,
        }
    }

    /// Short code shown on the locale toggle.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::Cn => "CN",
        }
    }

    pub fn strings(self) -> &'static UiText {
        match self {
            Locale::En => &EN,
            Locale::Cn => &CN,
        }
    }

    /// Window title for `app` in this locale.
    pub fn app_title(self, app: AppId) -> String {
        let text = self.strings();
        match app {
            AppId::Magi => text.magi.to_string(),
            AppId::Files => text.archives.to_string(),
            AppId::Personnel => text.personnel.to_string(),
            AppId::Terminal => text.terminal.to_string(),
            AppId::Settings => app.to_string(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "cn" | "zh" => Ok(Locale::Cn),
            _ => Err(ParseLocaleError(s.to_string())),
        }
    }
}

/// Locale-dependent UI strings.
#[derive(Debug)]
pub struct UiText {
    pub system_name: &'static str,
    pub version: &'static str,
    pub operations: &'static str,
    pub geofront: &'static str,
    pub status: &'static str,
    pub status_emergency: &'static str,
    pub priority: &'static str,
    pub launcher: &'static str,
    pub magi: &'static str,
    pub archives: &'static str,
    pub terminal: &'static str,
    pub personnel: &'static str,
}

static EN: UiText = UiText {
    system_name: "MAGI SYSTEM",
    version: "VER. 7.77",
    operations: "NERV TACTICAL OPERATIONS",
    geofront: "TOKYO-3 GEOFRONT",
    status: "STATUS: NORMAL",
    status_emergency: "STATUS: EMERGENCY",
    priority: "PRIORITY: AAA",
    launcher: "APPLICATION LAUNCHER",
    magi: "MAGI_SYS",
    archives: "ARCHIVES",
    terminal: "TERMINAL",
    personnel: "PERSONNEL GRAPH",
};

static CN: UiText = UiText {
    system_name: "MAGI 系统",
    version: "版本 7.77",
    operations: "NERV 战术作战部",
    geofront: "第三新东京市地下都市",
    status: "状态：正常",
    status_emergency: "状态：紧急事态",
    priority: "优先级：AAA",
    launcher: "应用程序",
    magi: "MAGI 决策系统",
    archives: "数据档案",
    terminal: "终端",
    personnel: "人员关系拓扑",
};
