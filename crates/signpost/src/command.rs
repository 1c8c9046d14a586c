//! Command descriptors and handler type erasure.
//!
//! A registered handler is compiled once into a [`CommandSpec`]: per-slot
//! metadata derived from the handler's signature plus an execution thunk
//! that takes already-converted values and invokes the handler. The thunk is
//! the only place that knows the handler's concrete argument types; the rest
//! of the engine works with `Box<dyn Any>` values keyed by [`TypeId`].
//!
//! [`IntoCommand`] is implemented for `FnMut` closures and functions of
//! arity 0 through 8. Handlers take their arguments by value and return
//! nothing; anything the command produces is a side effect of the handler.

use std::any::{Any, TypeId};

/// The type-erased execution thunk of a registered command.
///
/// Called with exactly `arity` converted values, in declaration order. The
/// error carries the index of a slot whose value failed to downcast to the
/// handler's declared type; this indicates a converter registered with a
/// mismatched output type and is reported as an argument failure rather
/// than a panic.
pub type ExecuteFn = Box<dyn FnMut(Vec<Box<dyn Any>>) -> Result<(), usize>>;

/// Identity of one argument slot's target type.
#[derive(Debug, Clone, Copy)]
pub struct ParamType {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

impl ParamType {
    /// The param type for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// A flag spelling attached to an argument slot.
///
/// A flag with a `value` supplies that fixed text when the flag appears (a
/// value flag); a flag without one redirects the following token into the
/// slot (a positional flag).
#[derive(Debug, Clone)]
pub(crate) struct Flag {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

/// Per-slot metadata of a command descriptor.
#[derive(Debug)]
pub(crate) struct Param {
    pub(crate) type_id: TypeId,
    pub(crate) flags: Vec<Flag>,
    pub(crate) default: Option<String>,
    pub(crate) display_name: Option<String>,
}

impl Param {
    fn new(ty: ParamType) -> Self {
        Self {
            type_id: ty.id,
            flags: Vec::new(),
            default: None,
            display_name: None,
        }
    }

    /// The placeholder shown for this slot in diagnostics: the display name
    /// if one was set, else `argN` (1-based).
    pub(crate) fn placeholder(&self, idx: usize) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => format!("arg{}", idx + 1),
        }
    }
}

/// A compiled command: slot metadata plus the execution thunk.
pub(crate) struct CommandSpec {
    pub(crate) params: Vec<Param>,
    pub(crate) execute: ExecuteFn,
}

impl CommandSpec {
    pub(crate) fn new<A, H: IntoCommand<A>>(handler: H) -> Self {
        let params = H::param_types().into_iter().map(Param::new).collect();
        Self {
            params,
            execute: handler.into_execute(),
        }
    }

    pub(crate) fn arity(&self) -> usize {
        self.params.len()
    }

    /// Looks up a flag name across all slots. First match wins, in slot
    /// index order. Returns the slot index and the fixed value if the flag
    /// is a value flag.
    pub(crate) fn find_flag(&self, name: &str) -> Option<(usize, Option<String>)> {
        for (idx, param) in self.params.iter().enumerate() {
            if let Some(flag) = param.flags.iter().find(|flag| flag.name == name) {
                return Some((idx, flag.value.clone()));
            }
        }
        None
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Conversion from a plain function or closure into a command.
///
/// Implemented for `FnMut` callables of arity 0 through 8 whose arguments
/// are all `'static`. The `Args` parameter is the tuple of argument types;
/// it exists only to keep the blanket implementations coherent and is
/// inferred at the call site.
pub trait IntoCommand<Args> {
    /// The target type of each argument slot, in declaration order.
    fn param_types() -> Vec<ParamType>;

    /// Wraps the callable in a thunk taking type-erased converted values.
    fn into_execute(self) -> ExecuteFn;
}

macro_rules! impl_into_command {
    ($($ty:ident),*) => {
        impl<F $(, $ty)*> IntoCommand<($($ty,)*)> for F
        where
            F: FnMut($($ty),*) + 'static,
            $($ty: 'static,)*
        {
            fn param_types() -> Vec<ParamType> {
                vec![$(ParamType::of::<$ty>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_execute(mut self) -> ExecuteFn {
                Box::new(move |values| {
                    let mut values = values.into_iter().enumerate();
                    $(
                        let $ty = match values.next() {
                            Some((idx, value)) => match value.downcast::<$ty>() {
                                Ok(value) => *value,
                                Err(_) => return Err(idx),
                            },
                            None => return Err(0),
                        };
                    )*
                    self($($ty),*);
                    Ok(())
                })
            }
        }
    };
}

impl_into_command!();
impl_into_command!(A1);
impl_into_command!(A1, A2);
impl_into_command!(A1, A2, A3);
impl_into_command!(A1, A2, A3, A4);
impl_into_command!(A1, A2, A3, A4, A5);
impl_into_command!(A1, A2, A3, A4, A5, A6);
impl_into_command!(A1, A2, A3, A4, A5, A6, A7);
impl_into_command!(A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn boxed<T: 'static>(value: T) -> Box<dyn Any> {
        Box::new(value)
    }

    #[test]
    fn test_param_types_match_signature() {
        fn handler(_x: i32, _y: f64, _z: String) {}

        let types = <fn(i32, f64, String) as IntoCommand<(i32, f64, String)>>::param_types();
        assert_eq!(types.len(), 3);
        assert_eq!(types[0].id, TypeId::of::<i32>());
        assert_eq!(types[1].id, TypeId::of::<f64>());
        assert_eq!(types[2].id, TypeId::of::<String>());

        // The fn item itself compiles into a spec.
        let spec = CommandSpec::new(handler as fn(i32, f64, String));
        assert_eq!(spec.arity(), 3);
    }

    #[test]
    fn test_execute_invokes_with_converted_values() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut spec = CommandSpec::new(move |x: i32, y: i32| {
            sink.borrow_mut().push(x + y);
        });

        (spec.execute)(vec![boxed(40i32), boxed(2i32)]).unwrap();
        assert_eq!(*seen.borrow(), vec![42]);
    }

    #[test]
    fn test_execute_zero_arity() {
        let called = Rc::new(RefCell::new(false));
        let sink = called.clone();

        let mut spec = CommandSpec::new(move || {
            *sink.borrow_mut() = true;
        });

        assert_eq!(spec.arity(), 0);
        (spec.execute)(Vec::new()).unwrap();
        assert!(*called.borrow());
    }

    #[test]
    fn test_execute_reports_downcast_mismatch() {
        let mut spec = CommandSpec::new(|_x: i32, _y: f64| {});

        // Slot 1 carries a String where the handler expects f64.
        let result = (spec.execute)(vec![boxed(1i32), boxed("oops".to_string())]);
        assert_eq!(result, Err(1));
    }

    #[test]
    fn test_find_flag_first_match_wins() {
        let mut spec = CommandSpec::new(|_x: i32, _y: i32| {});
        spec.params[0].flags.push(Flag {
            name: "n".into(),
            value: None,
        });
        spec.params[1].flags.push(Flag {
            name: "n".into(),
            value: Some("9".into()),
        });
        spec.params[1].flags.push(Flag {
            name: "fast".into(),
            value: Some("100".into()),
        });

        // "n" appears on both slots; slot 0 wins.
        assert_eq!(spec.find_flag("n"), Some((0, None)));
        assert_eq!(spec.find_flag("fast"), Some((1, Some("100".into()))));
        assert_eq!(spec.find_flag("missing"), None);
    }

    #[test]
    fn test_placeholder_naming() {
        let mut spec = CommandSpec::new(|_x: i32, _y: i32| {});
        spec.params[0].display_name = Some("count".into());

        assert_eq!(spec.params[0].placeholder(0), "count");
        assert_eq!(spec.params[1].placeholder(1), "arg2");
    }
}
