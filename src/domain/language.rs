use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AppError;

/// Target framework for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Django,
    NextJs,
    NestJs,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Django, Language::NextJs, Language::NestJs];

    /// Identifier used on the command line and in catalog file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Django => "django",
            Language::NextJs => "nextjs",
            Language::NestJs => "nestjs",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Django => "Python (Django)",
            Language::NextJs => "TypeScript (Next.js)",
            Language::NestJs => "TypeScript (NestJS)",
        }
    }

    /// Empty file that marks a directory as a package, written alongside generated files.
    pub fn package_marker(&self) -> Option<&'static str> {
        match self {
            Language::Django => Some("__init__.py"),
            Language::NextJs | Language::NestJs => None,
        }
    }

    /// Shell commands suggested after a successful run.
    pub fn next_steps(&self) -> &'static [&'static str] {
        match self {
            Language::Django => &[
                "python -m venv venv",
                "source venv/bin/activate",
                "pip install django djangorestframework",
                "add the generated apps to INSTALLED_APPS",
                "python manage.py makemigrations && python manage.py migrate",
            ],
            Language::NextJs => &["npm install", "import the generated components", "npm run dev"],
            Language::NestJs => &[
                "npm install",
                "register the generated modules in app.module.ts",
                "npm run start:dev",
            ],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "django" | "python" => Ok(Language::Django),
            "nextjs" | "next" | "next.js" => Ok(Language::NextJs),
            "nestjs" | "nest" => Ok(Language::NestJs),
            _ => Err(AppError::InvalidLanguage(value.to_string())),
        }
    }
}
