//! Persisted client state: the signed-in user and the comparison picks.

pub mod storage;

pub use storage::{
    clear_selection, clear_session, get_data_dir, load_selection, load_session, save_selection,
    save_session, SessionUser, StorageError, StoredSelection,
};
