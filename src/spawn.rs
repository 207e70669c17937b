use std::{cell::RefCell, rc::Rc};

use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};

thread_local! {
    static LOCAL_SPAWN: RefCell<Rc<dyn LocalSpawn>> = RefCell::new(Rc::new(LocalSpawnNotSet));
}
struct LocalSpawnNotSet;
impl LocalSpawn for LocalSpawnNotSet {
    fn spawn_local_obj(&self, _: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        panic!("need to call `set_current_local_spawn`.");
    }
}

/// Sets the spawner used by [`wait_once`](crate::wait_once) on this thread.
pub fn set_current_local_spawn(sp: impl LocalSpawn + 'static) {
    LOCAL_SPAWN.with(|value| *value.borrow_mut() = Rc::new(sp));
}
pub fn current_local_spawn() -> Rc<dyn LocalSpawn + 'static> {
    LOCAL_SPAWN.with(|value| value.borrow().clone())
}
