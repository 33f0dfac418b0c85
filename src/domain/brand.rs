//! Brands an operator markets its infrastructure under

use super::i18n::I18NText;
use super::ids::BrandId;

#[derive(Debug, Clone, Default)]
pub struct BrandDraft {
    pub name: I18NText,
    pub logo: Option<String>,
    pub homepage: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Brand {
    pub id: BrandId,
    pub name: I18NText,
    pub logo: Option<String>,
    pub homepage: Option<String>,
}

impl Brand {
    pub fn new(id: BrandId, draft: BrandDraft) -> Self {
        Self {
            id,
            name: draft.name,
            logo: draft.logo,
            homepage: draft.homepage,
        }
    }
}
