//! Replaces allow-listed plugin hooks with timed wrappers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;

use crate::label::HOOK_LEVEL;
use crate::plugin::{Hook, HookError, HookOutput, Plugin};
use crate::session::Session;

/// The hooks that get timed wrappers. Every other hook passes through with
/// its reference unchanged.
pub const TIMED_HOOKS: &[&str] = &["load", "resolveDynamicImport", "resolveId", "transform"];

/// Rewrites a plugin list in place so that every allow-listed hook is timed
/// through the session.
///
/// Plugin order is preserved. For the plugin at index `i` the wrapped hooks
/// record under the label prefix `plugin {i}`, extended with ` ({name})` when
/// the plugin declares a display name, then ` - {hook}`. Hooks whose wire
/// name is not in `timed_hooks` keep the exact same function reference.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use hook_stopwatch::{
///     HookOutput, Plugin, Session, SessionOptions, TIMED_HOOKS, instrument,
/// };
///
/// let session = Session::initialise::<u32>(
///     SessionOptions {
///         perf: true,
///         trace: false,
///     },
///     None,
///     &mut Vec::new(),
/// );
///
/// let mut plugins = vec![Arc::new(
///     Plugin::<u32>::builder()
///         .name("doubler")
///         .hook("transform", |_plugin, value| Ok(HookOutput::Ready(value * 2)))
///         .build(),
/// )];
/// instrument(&mut plugins, TIMED_HOOKS, &session);
///
/// let hook = plugins[0].hook("transform").unwrap();
/// let output = hook(&plugins[0], 21).unwrap();
/// assert!(matches!(output, HookOutput::Ready(42)));
/// ```
pub fn instrument<T>(plugins: &mut [Arc<Plugin<T>>], timed_hooks: &[&str], session: &Session)
where
    T: 'static,
{
    for (index, plugin) in plugins.iter_mut().enumerate() {
        *plugin = Arc::new(wrap_plugin(plugin, index, timed_hooks, session));
    }
}

fn wrap_plugin<T>(
    original: &Arc<Plugin<T>>,
    index: usize,
    timed_hooks: &[&str],
    session: &Session,
) -> Plugin<T>
where
    T: 'static,
{
    let mut prefix = format!("plugin {index}");
    if let Some(name) = original.name() {
        prefix.push_str(&format!(" ({name})"));
    }

    let hooks = original
        .hooks()
        .iter()
        .map(|(hook_name, hook)| {
            let hook = if timed_hooks.contains(&hook_name.as_str()) {
                wrap_hook(
                    Arc::clone(original),
                    Arc::clone(hook),
                    format!("{prefix} - {hook_name}"),
                    session.clone(),
                )
            } else {
                Arc::clone(hook)
            };

            (hook_name.clone(), hook)
        })
        .collect();

    Plugin::from_parts(original.name().map(str::to_owned), hooks)
}

fn wrap_hook<T>(
    original: Arc<Plugin<T>>,
    hook: Hook<T>,
    label: String,
    session: Session,
) -> Hook<T>
where
    T: 'static,
{
    Arc::new(move |_receiver, payload| {
        session.time_start(&label, HOOK_LEVEL);

        // The receiver the wrapper was handed is the wrapper's own plugin;
        // the hook must see the plugin it was declared on. A synchronous
        // failure propagates here, before the end call, so the interval for
        // this label stays open.
        let output = hook(&original, payload)?;

        session.time_end(&label, HOOK_LEVEL);

        match output {
            HookOutput::Ready(value) => Ok(HookOutput::Ready(value)),
            HookOutput::Deferred(inner) => {
                let async_label = format!("{label} (async)");
                session.time_start(&async_label, HOOK_LEVEL);

                Ok(HookOutput::Deferred(Box::pin(TimedCompletion {
                    inner: Some(inner),
                    session: session.clone(),
                    label: async_label,
                })))
            }
        }
    })
}

/// Ends the deferred-portion timer exactly once, when the inner future
/// settles, then yields the settled value or failure unchanged.
struct TimedCompletion<T> {
    inner: Option<BoxFuture<'static, Result<T, HookError>>>,
    session: Session,
    label: String,
}

impl<T> Future for TimedCompletion<T> {
    type Output = Result<T, HookError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // All fields are Unpin; no structural pinning needed.
        let this = self.get_mut();

        let inner = this
            .inner
            .as_mut()
            .expect("TimedCompletion polled after completion");

        match inner.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(result) => {
                // Fuse so the timer cannot end twice.
                this.inner = None;
                this.session.time_end(&this.label, HOOK_LEVEL);
                Poll::Ready(result)
            }
        }
    }
}
