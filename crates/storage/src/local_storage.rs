use gloo_storage::Storage as GlooStorage;

use crate::{Backend, BackendError};

/// Backend on top of the local storage of the browser.
///
/// Values are stored as raw strings, so entries written by other clients of the same origin stay
/// readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl Backend for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        gloo_storage::LocalStorage::raw()
            .get_item(key)
            .map_err(|err| BackendError::Unavailable(format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| BackendError::Unavailable(format!("{err:?}")))
    }
}

#[cfg(test)]
mod tests {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use pretty_assertions::assert_eq;
        use wasm_bindgen_test::wasm_bindgen_test;

        use crate::{Backend, Key, Store};

        use super::super::*;

        #[wasm_bindgen_test]
        fn test_get_and_set() {
            gloo_storage::LocalStorage::clear();

            assert_eq!(LocalStorage.get(Key::Globals.as_ref()).unwrap(), None);

            LocalStorage.set(Key::Globals.as_ref(), "{}").unwrap();

            assert_eq!(
                LocalStorage.get(Key::Globals.as_ref()).unwrap(),
                Some("{}".to_string())
            );
        }

        #[wasm_bindgen_test]
        fn test_store_survives_reload() {
            use liftlog_domain::ExerciseRepository;

            gloo_storage::LocalStorage::clear();

            Store::new(LocalStorage)
                .create_exercise(liftlog_domain::Exercise::new("Bench".into(), 1.into()))
                .unwrap();

            assert_eq!(
                Store::new(LocalStorage).read_exercises(),
                vec![liftlog_domain::Exercise::new("Bench".into(), 1.into())]
            );
        }
    }
}
