use std::ops::{Deref, DerefMut};

/// Owner of a raw SQLite handle, releases it with `dealloc` unless null.
#[derive(Debug)]
pub(crate) struct CBox<T> {
    pub(crate) ptr: *mut T,
    dealloc: fn(*mut T),
}

impl<T> CBox<T> {
    pub fn new(ptr: *mut T, dealloc: fn(*mut T)) -> Self {
        Self { ptr, dealloc }
    }

    /// Copy of the handle that never releases it.
    pub fn borrowed(&self) -> Self {
        Self::new(self.ptr, |_| {})
    }
}

impl<T> Drop for CBox<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            (self.dealloc)(self.ptr);
        }
    }
}

impl<T> Deref for CBox<T> {
    type Target = *mut T;

    fn deref(&self) -> &Self::Target {
        &self.ptr
    }
}

impl<T> DerefMut for CBox<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ptr
    }
}

unsafe impl<T> Send for CBox<T> {}
unsafe impl<T> Sync for CBox<T> {}
