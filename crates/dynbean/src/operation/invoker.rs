// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased invokers built from plain Rust functions.
//!
//! `IntoOperation` is implemented for every `Fn(A0, .., An) -> R` with up to
//! six arguments whose types convert from open values. The argument and
//! return types are captured as `TypeToken`s so the operation's signature
//! can be resolved without a sample call.

use crate::error::BoxError;
use crate::open_type::{FromOpenValue, IntoOpenValue, OpenValue, TypeToken};
use std::fmt;
use std::sync::Arc;

/// Failure of a type-erased invoker.
#[derive(Debug)]
pub enum InvokeError {
    /// Argument count differs from the invoker's arity.
    Arity { expected: usize, got: usize },
    /// Argument at `index` could not be converted.
    Argument { index: usize, reason: String },
    /// The bound function itself failed.
    Failed(BoxError),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity { expected, got } => {
                write!(f, "expected {} arguments, got {}", expected, got)
            }
            Self::Argument { index, reason } => write!(f, "argument {}: {}", index, reason),
            Self::Failed(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InvokeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Type-erased operation body.
pub type Invoker =
    Arc<dyn Fn(&[OpenValue]) -> std::result::Result<OpenValue, InvokeError> + Send + Sync>;

/// Plain functions usable as operation bodies.
///
/// `Args` is the argument tuple, `R` the return type.
pub trait IntoOperation<Args, R>: Send + Sync + 'static {
    /// Argument type tokens, in order.
    fn parameter_types() -> Vec<TypeToken>;
    /// Return type token.
    fn return_type() -> TypeToken;
    /// Erase into an invoker.
    fn into_invoker(self) -> Invoker;
}

/// Fallible functions usable as operation bodies.
///
/// `E` is the function's error type, boxed into `InvokeError::Failed`.
pub trait IntoTryOperation<Args, R, E>: Send + Sync + 'static {
    fn parameter_types() -> Vec<TypeToken>;
    fn return_type() -> TypeToken;
    fn into_invoker(self) -> Invoker;
}

fn check_arity(expected: usize, args: &[OpenValue]) -> std::result::Result<(), InvokeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(InvokeError::Arity {
            expected,
            got: args.len(),
        })
    }
}

fn convert_arg<A: FromOpenValue>(
    args: &[OpenValue],
    index: usize,
) -> std::result::Result<A, InvokeError> {
    A::from_open_value(&args[index]).map_err(|e| InvokeError::Argument {
        index,
        reason: e.to_string(),
    })
}

macro_rules! impl_into_operation {
    ($($arg:ident : $idx:tt),*) => {
        impl<F, R, $($arg,)*> IntoOperation<($($arg,)*), R> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: IntoOpenValue + 'static,
            $($arg: FromOpenValue + 'static,)*
        {
            fn parameter_types() -> Vec<TypeToken> {
                vec![$(TypeToken::of::<$arg>()),*]
            }

            fn return_type() -> TypeToken {
                TypeToken::of::<R>()
            }

            fn into_invoker(self) -> Invoker {
                Arc::new(move |args: &[OpenValue]| {
                    let names: &[&str] = &[$(stringify!($arg)),*];
                    check_arity(names.len(), args)?;
                    Ok((self)($(convert_arg::<$arg>(args, $idx)?),*).into_open_value())
                })
            }
        }

        impl<F, R, E, $($arg,)*> IntoTryOperation<($($arg,)*), R, E> for F
        where
            F: Fn($($arg),*) -> std::result::Result<R, E> + Send + Sync + 'static,
            R: IntoOpenValue + 'static,
            E: Into<BoxError> + 'static,
            $($arg: FromOpenValue + 'static,)*
        {
            fn parameter_types() -> Vec<TypeToken> {
                vec![$(TypeToken::of::<$arg>()),*]
            }

            fn return_type() -> TypeToken {
                TypeToken::of::<R>()
            }

            fn into_invoker(self) -> Invoker {
                Arc::new(move |args: &[OpenValue]| {
                    let names: &[&str] = &[$(stringify!($arg)),*];
                    check_arity(names.len(), args)?;
                    (self)($(convert_arg::<$arg>(args, $idx)?),*)
                        .map(IntoOpenValue::into_open_value)
                        .map_err(|e| InvokeError::Failed(e.into()))
                })
            }
        }
    };
}

impl_into_operation!();
impl_into_operation!(A0: 0);
impl_into_operation!(A0: 0, A1: 1);
impl_into_operation!(A0: 0, A1: 1, A2: 2);
impl_into_operation!(A0: 0, A1: 1, A2: 2, A3: 3);
impl_into_operation!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4);
impl_into_operation!(A0: 0, A1: 1, A2: 2, A3: 3, A4: 4, A5: 5);

/// Erase a function; helper used by builders and `MethodBinding`.
pub(crate) fn erase<Args, R, F>(f: F) -> (Vec<TypeToken>, TypeToken, Invoker)
where
    F: IntoOperation<Args, R>,
{
    (F::parameter_types(), F::return_type(), f.into_invoker())
}

/// Erase a fallible function.
pub(crate) fn erase_try<Args, R, E, F>(f: F) -> (Vec<TypeToken>, TypeToken, Invoker)
where
    F: IntoTryOperation<Args, R, E>,
{
    (F::parameter_types(), F::return_type(), f.into_invoker())
}
