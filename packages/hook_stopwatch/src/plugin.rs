//! Plugin boundary: a plugin as a capability set of named hooks.
//!
//! The pipeline driver supplies a list of plugins; each plugin declares zero
//! or more hook functions under the pipeline's wire names, plus an optional
//! display name used only for label readability. The payload type `T` is
//! whatever the pipeline passes through its hooks; this package never
//! inspects it.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

/// Failure raised by a user-supplied hook.
///
/// This package defines no error taxonomy of its own; hook failures travel
/// through the instrumentation layer completely unchanged.
pub type HookError = Box<dyn Error + Send + Sync>;

/// What a hook call produces: a synchronous failure, a ready value, or a
/// deferred continuation.
pub type HookResult<T> = Result<HookOutput<T>, HookError>;

/// A hook function. The first parameter is the receiver: the plugin the hook
/// belongs to.
pub type Hook<T> = Arc<dyn Fn(&Plugin<T>, T) -> HookResult<T> + Send + Sync>;

/// The successful outcome of a hook call.
pub enum HookOutput<T> {
    /// The hook completed synchronously.
    Ready(T),
    /// The hook returned a deferred value that settles later with the real
    /// outcome or failure.
    Deferred(BoxFuture<'static, Result<T, HookError>>),
}

impl<T> fmt::Debug for HookOutput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("Ready(..)"),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A pipeline extension described by the set of named hooks it implements.
///
/// # Examples
///
/// ```
/// use hook_stopwatch::{HookOutput, Plugin};
///
/// let plugin = Plugin::<String>::builder()
///     .name("uppercase")
///     .hook("transform", |_plugin, code: String| {
///         Ok(HookOutput::Ready(code.to_uppercase()))
///     })
///     .build();
///
/// assert_eq!(plugin.name(), Some("uppercase"));
/// assert!(plugin.hook("transform").is_some());
/// assert!(plugin.hook("buildEnd").is_none());
/// ```
pub struct Plugin<T> {
    name: Option<String>,
    hooks: HashMap<String, Hook<T>>,
}

impl<T> Plugin<T> {
    /// Starts building a plugin.
    #[must_use]
    pub fn builder() -> PluginBuilder<T> {
        PluginBuilder {
            name: None,
            hooks: HashMap::new(),
        }
    }

    pub(crate) fn from_parts(name: Option<String>, hooks: HashMap<String, Hook<T>>) -> Self {
        Self { name, hooks }
    }

    /// The display name the plugin declared, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The hook registered under the given wire name, if the plugin
    /// implements it.
    #[must_use]
    pub fn hook(&self, hook_name: &str) -> Option<&Hook<T>> {
        self.hooks.get(hook_name)
    }

    /// The wire names of all hooks this plugin implements.
    pub fn hook_names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    pub(crate) fn hooks(&self) -> &HashMap<String, Hook<T>> {
        &self.hooks
    }
}

impl<T> fmt::Debug for Plugin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hook_names: Vec<_> = self.hooks.keys().collect();
        hook_names.sort();

        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("hooks", &hook_names)
            .finish()
    }
}

/// Builder for [`Plugin`] values.
pub struct PluginBuilder<T> {
    name: Option<String>,
    hooks: HashMap<String, Hook<T>>,
}

impl<T> PluginBuilder<T> {
    /// Sets the plugin's display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Registers a hook under a wire name, replacing any previous hook with
    /// the same name.
    #[must_use]
    pub fn hook(
        mut self,
        hook_name: impl Into<String>,
        hook: impl Fn(&Plugin<T>, T) -> HookResult<T> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.insert(hook_name.into(), Arc::new(hook));
        self
    }

    /// Finishes building the plugin.
    #[must_use]
    pub fn build(self) -> Plugin<T> {
        Plugin {
            name: self.name,
            hooks: self.hooks,
        }
    }
}

impl<T> fmt::Debug for PluginBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hook_names: Vec<_> = self.hooks.keys().collect();
        hook_names.sort();

        f.debug_struct("PluginBuilder")
            .field("name", &self.name)
            .field("hooks", &hook_names)
            .finish()
    }
}
