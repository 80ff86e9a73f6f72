//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{Result, Uuid};
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
/// A poisoned lock is taken over as is.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .unwrap_or_else(sync::PoisonError::into_inner)
}

/// Generates a UUIDv7 object.
///
/// This function employs a global generator and guarantees the process-wide monotonic order of
/// the timestamp and counter fields. On Unix, this function resets the generator when the process
/// ID changes (i.e., upon process forks).
///
/// # Errors
///
/// Returns [`Error::RandomSourceFailure`](crate::Error::RandomSourceFailure) if the operating
/// system random source fails.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidcore::uuid7()?;
/// println!("{}", uuid); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuidcore::uuid7()?.to_string();
/// # Ok::<(), uuidcore::Error>(())
/// ```
pub fn uuid7() -> Result<Uuid> {
    lock_global_gen().get_mut().generate()
}

/// Generates a UUIDv4 object.
///
/// # Errors
///
/// Returns [`Error::RandomSourceFailure`](crate::Error::RandomSourceFailure) if the operating
/// system random source fails.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidcore::uuid4()?;
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// # Ok::<(), uuidcore::Error>(())
/// ```
pub fn uuid4() -> Result<Uuid> {
    lock_global_gen().get_mut().generate_v4()
}

mod inner {
    use rand::rngs::OsRng;

    use crate::generator::{with_rand08::Adapter, V7Generator};

    /// The global generator draws every random byte directly from the operating system.
    pub type GlobalGen = V7Generator<Adapter<OsRng>>;

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: GlobalGen,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: V7Generator::with_rand08(OsRng),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`V7Generator`] instance, resetting the
        /// generator state on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut GlobalGen {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                tracing::debug!(
                    pid = std::process::id(),
                    "process id changed; resetting uuid generator"
                );
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}
