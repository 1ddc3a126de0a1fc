use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use vc_introspect::{TypeHandle, TypeInfo, TypeIntrospector};

use crate::error::SettingsError;

// -----------------------------------------------------------------------------
// TagMode

/// Which tags a walk keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagMode {
    #[default]
    All,
    None,
    /// Only tags matching the allow list.
    AllowList,
    /// Every tag except those matching the deny list.
    DenyList,
}

// -----------------------------------------------------------------------------
// TagMatch

/// How a listed tag type is compared with a found tag type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagMatch {
    /// Same handle.
    #[default]
    ReferenceEquality,
    /// Same name without module path.
    Name,
    /// Same path and defining unit.
    QualifiedName,
    /// Same full path.
    FullName,
}

impl TagMatch {
    fn matches(self, introspector: &dyn TypeIntrospector, listed: TypeHandle, found: TypeHandle) -> bool {
        if self == Self::ReferenceEquality || listed == found {
            return listed == found;
        }
        let (Some(a), Some(b)) = (introspector.type_info(listed), introspector.type_info(found)) else {
            return false;
        };
        match self {
            Self::ReferenceEquality => false,
            Self::Name => a.name() == b.name(),
            Self::QualifiedName => a.qualified_name() == b.qualified_name(),
            Self::FullName => a.path() == b.path(),
        }
    }
}

// -----------------------------------------------------------------------------
// TagSettings

/// Tag include policy.
///
/// The forced-skip rules apply in every mode: a tag whose type lives under a
/// forced-skip namespace, or whose full path is a forced-skip name, is never
/// kept.
///
/// # Examples
///
/// ```
/// use vc_dehydrate::settings::{TagMode, TagSettings};
/// use vc_introspect::{SchemaRegistry, TypeInfo};
///
/// let mut schema = SchemaRegistry::new();
/// let hidden = schema.register(TypeInfo::composite("ui::Hidden")).unwrap();
/// let label = schema.register(TypeInfo::composite("ui::Label")).unwrap();
/// let copy = schema.register(TypeInfo::composite("core::marker::Copy")).unwrap();
///
/// let tags = TagSettings::deny([hidden]);
/// assert_eq!(tags.mode, TagMode::DenyList);
/// assert!(!tags.admits(&schema, hidden));
/// assert!(tags.admits(&schema, label));
/// assert!(!TagSettings::default().admits(&schema, copy));
/// ```
#[derive(Debug, Clone)]
pub struct TagSettings {
    pub mode: TagMode,
    pub matching: TagMatch,
    allow: Vec<TypeHandle>,
    deny: Vec<TypeHandle>,
    pub forced_skip_namespaces: Vec<String>,
    pub forced_skip_names: Vec<String>,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            mode: TagMode::All,
            matching: TagMatch::ReferenceEquality,
            allow: Vec::new(),
            deny: Vec::new(),
            forced_skip_namespaces: alloc::vec!["core".to_owned()],
            forced_skip_names: alloc::vec![
                "core::marker::Copy".to_owned(),
                "core::marker::Sized".to_owned(),
            ],
        }
    }
}

impl TagSettings {
    /// Keeps only tags matching `list`.
    pub fn allow(list: impl IntoIterator<Item = TypeHandle>) -> Self {
        Self {
            mode: TagMode::AllowList,
            allow: list.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Keeps every tag except those matching `list`.
    pub fn deny(list: impl IntoIterator<Item = TypeHandle>) -> Self {
        Self {
            mode: TagMode::DenyList,
            deny: list.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Keeps no tag.
    pub fn none() -> Self {
        Self {
            mode: TagMode::None,
            ..Self::default()
        }
    }

    /// Sets the allow list and switches to [`TagMode::AllowList`].
    ///
    /// Fails if a deny list is already set.
    pub fn with_allow_list(
        self,
        list: impl IntoIterator<Item = TypeHandle>,
    ) -> Result<Self, SettingsError> {
        if !self.deny.is_empty() {
            return Err(SettingsError::ConflictingTagLists);
        }
        Ok(Self {
            mode: TagMode::AllowList,
            allow: list.into_iter().collect(),
            ..self
        })
    }

    /// Sets the deny list and switches to [`TagMode::DenyList`].
    ///
    /// Fails if an allow list is already set.
    pub fn with_deny_list(
        self,
        list: impl IntoIterator<Item = TypeHandle>,
    ) -> Result<Self, SettingsError> {
        if !self.allow.is_empty() {
            return Err(SettingsError::ConflictingTagLists);
        }
        Ok(Self {
            mode: TagMode::DenyList,
            deny: list.into_iter().collect(),
            ..self
        })
    }

    pub fn with_matching(self, matching: TagMatch) -> Self {
        Self { matching, ..self }
    }

    #[inline]
    pub fn allow_list(&self) -> &[TypeHandle] {
        &self.allow
    }

    #[inline]
    pub fn deny_list(&self) -> &[TypeHandle] {
        &self.deny
    }

    fn is_forced_skip(&self, info: &TypeInfo) -> bool {
        let path = info.path();
        let in_namespace = self.forced_skip_namespaces.iter().any(|prefix| {
            path.len() > prefix.len() + 2
                && path.starts_with(prefix.as_str())
                && path[prefix.len()..].starts_with("::")
        });
        in_namespace || self.forced_skip_names.iter().any(|name| name == path)
    }

    /// Returns `true` if a tag of type `tag` is kept.
    ///
    /// Tags of unknown type are never kept.
    pub fn admits(&self, introspector: &dyn TypeIntrospector, tag: TypeHandle) -> bool {
        let Some(info) = introspector.type_info(tag) else {
            return false;
        };
        if self.is_forced_skip(info) {
            return false;
        }
        let listed = |list: &[TypeHandle]| {
            list.iter()
                .any(|&listed| self.matching.matches(introspector, listed, tag))
        };
        match self.mode {
            TagMode::All => true,
            TagMode::None => false,
            TagMode::AllowList => listed(&self.allow),
            TagMode::DenyList => !listed(&self.deny),
        }
    }
}
