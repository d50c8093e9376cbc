//! uid to account name resolution, cached for the probe's lifetime

use std::collections::HashMap;

use users::get_user_by_uid;

#[derive(Debug, Default)]
pub struct UserCache {
    names: HashMap<u32, String>,
}

impl UserCache {
    /// Account name for `uid`; unknown uids are shown numerically.
    pub fn name(&mut self, uid: u32) -> Option<String> {
        let name = self.names.entry(uid).or_insert_with(|| {
            get_user_by_uid(uid)
                .map(|u| u.name().to_string_lossy().to_string())
                .unwrap_or_else(|| uid.to_string())
        });
        Some(name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_resolves() {
        let mut cache = UserCache::default();
        assert_eq!(cache.name(0).as_deref(), Some("root"));
        assert_eq!(cache.names.len(), 1, "lookup is cached");
    }
}
