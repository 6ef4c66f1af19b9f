//! Property application and diffing.

use tracing::warn;

use crate::dom::LiveNode;
use crate::vdom::{listener_event, Prop, Properties};

/// Apply one property to a live node: bind a listener or assign a value.
pub(crate) fn apply_property(live: &LiveNode, key: &str, prop: &Prop) {
    match (listener_event(key), prop) {
        (Some(event), Prop::Listener(listener)) => {
            live.add_event_listener(&event, listener.clone());
        }
        (None, Prop::Value(value)) => live.set_property(key, value.clone()),
        (Some(_), Prop::Value(_)) => {
            warn!(key, "listener key holds a plain value; skipping");
        }
        (None, Prop::Listener(_)) => {
            warn!(key, "listener bound to a non-listener key; skipping");
        }
    }
}

/// Undo [`apply_property`] for a property that is going away.
pub(crate) fn clear_property(live: &LiveNode, key: &str, prop: &Prop) {
    match (listener_event(key), prop) {
        (Some(event), Prop::Listener(listener)) => {
            live.remove_event_listener(&event, listener);
        }
        (None, Prop::Value(_)) => {
            live.remove_property(key);
        }
        // Never applied, nothing to undo.
        _ => {}
    }
}

/// Bring `live` from `old` to `new` properties.
///
/// Removed keys are cleared, added keys applied. A key in both is touched only
/// if its value changed; listeners compare by reference, so a rebind detaches
/// exactly the callback `old` attached.
pub(crate) fn diff_properties(live: &LiveNode, old: &Properties, new: &Properties) {
    for (key, old_prop) in old {
        match new.get(key) {
            None => clear_property(live, key, old_prop),
            Some(new_prop) if new_prop != old_prop => {
                if let Prop::Listener(_) = old_prop {
                    clear_property(live, key, old_prop);
                }
                apply_property(live, key, new_prop);
            }
            Some(_) => {}
        }
    }

    for (key, new_prop) in new {
        if !old.contains_key(key) {
            apply_property(live, key, new_prop);
        }
    }
}
