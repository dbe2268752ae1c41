//! Constants used throughout the package.

pub(crate) const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - continued execution is not possible";
