/// Builds a [`Tool`](crate::Tool) from a function item.
///
/// The function name becomes the tool name, its `///` lines become the
/// description and each parameter type supplies the declared type tag.
/// Arguments are coerced and then deserialized into the parameter types;
/// `Option<T>` parameters may be omitted by the model.
///
/// ```rust
/// use serde_json::json;
/// use toolrun::{ParamType, tool_fn};
///
/// let add = tool_fn! {
///     /// Add two integers.
///     fn add(a: i64, b: i64) -> i64 {
///         a + b
///     }
/// }
/// .expect("add builds");
///
/// assert_eq!(add.name(), "add");
/// assert_eq!(add.description(), "Add two integers.");
/// assert_eq!(add.params()[0].param_type, ParamType::Int);
/// let output = add
///     .call(json!({"a": "2", "b": 3}).as_object().expect("object"))
///     .expect("call succeeds");
/// assert_eq!(output, json!(5));
/// ```
///
/// A function without a return type yields `null`.
///
/// A function returning `Result<T, E>` reports `Err` as a tool execution
/// failure:
///
/// ```rust
/// use serde_json::json;
/// use toolrun::{ToolErrorKind, tool_fn};
///
/// let divide = tool_fn! {
///     fn divide(a: f64, b: f64) -> Result<f64, String> {
///         if b == 0.0 {
///             return Err("division by zero".to_string());
///         }
///         Ok(a / b)
///     }
/// }
/// .expect("divide builds");
///
/// let error = divide
///     .call(json!({"a": 1, "b": 0}).as_object().expect("object"))
///     .expect_err("zero divisor");
/// assert_eq!(error.kind, ToolErrorKind::Execution);
/// assert_eq!(error.detail(), "division by zero");
/// ```
#[macro_export]
macro_rules! tool_fn {
    (
        $(#[doc = $doc:literal])*
        fn $name:ident($($param:ident : $ty:ty),* $(,)?) -> Result<$ok:ty, $err:ty> $body:block
    ) => {{
        fn $name($($param: $ty),*) -> Result<$ok, $err> $body

        $crate::__tool_fn_builder!($name, [$($doc),*], [$($param: $ty),*])
            .handler(
                |arguments: &$crate::ttooling::ToolArgs|
                 -> ::std::result::Result<$ok, ::std::string::String> {
                    let _ = arguments;
                    $(
                        let $param: $ty =
                            $crate::ttooling::extract_arg(arguments, stringify!($param))
                                .map_err(|err| err.message)?;
                    )*
                    $name($($param),*).map_err(|err| err.to_string())
                },
            )
            .build()
    }};
    (
        $(#[doc = $doc:literal])*
        fn $name:ident($($param:ident : $ty:ty),* $(,)?) -> $ret:ty $body:block
    ) => {{
        fn $name($($param: $ty),*) -> $ret $body

        $crate::__tool_fn_builder!($name, [$($doc),*], [$($param: $ty),*])
            .handler(
                |arguments: &$crate::ttooling::ToolArgs|
                 -> ::std::result::Result<$ret, ::std::string::String> {
                    let _ = arguments;
                    $(
                        let $param: $ty =
                            $crate::ttooling::extract_arg(arguments, stringify!($param))
                                .map_err(|err| err.message)?;
                    )*
                    Ok($name($($param),*))
                },
            )
            .build()
    }};
    (
        $(#[doc = $doc:literal])*
        fn $name:ident($($param:ident : $ty:ty),* $(,)?) $body:block
    ) => {{
        fn $name($($param: $ty),*) $body

        $crate::__tool_fn_builder!($name, [$($doc),*], [$($param: $ty),*])
            .handler(
                |arguments: &$crate::ttooling::ToolArgs|
                 -> ::std::result::Result<(), ::std::string::String> {
                    let _ = arguments;
                    $(
                        let $param: $ty =
                            $crate::ttooling::extract_arg(arguments, stringify!($param))
                                .map_err(|err| err.message)?;
                    )*
                    $name($($param),*);
                    Ok(())
                },
            )
            .build()
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tool_fn_builder {
    ($name:ident, [$($doc:literal),*], [$($param:ident: $ty:ty),*]) => {
        $crate::ttooling::Tool::builder(stringify!($name))
            .doc(&[$($doc),*])
            $(
                .param(
                    stringify!($param),
                    <$ty as $crate::ttooling::ToolParam>::param_type(),
                )
            )*
    };
}

/// Builds a [`ToolRegistry`](crate::ToolRegistry) from tools, stopping at
/// the first one that fails to build.
///
/// ```rust
/// use toolrun::{tool_fn, tools};
///
/// let registry = tools![
///     tool_fn! { fn ping() -> &'static str { "pong" } },
///     tool_fn! { fn shout(text: String) -> String { text.to_uppercase() } },
/// ]
/// .expect("tools build");
///
/// assert_eq!(registry.list_tools(), vec!["ping", "shout"]);
/// ```
#[macro_export]
macro_rules! tools {
    () => {
        ::std::result::Result::<_, $crate::ttooling::ToolError>::Ok(
            $crate::ttooling::ToolRegistry::new(),
        )
    };
    ($($tool:expr),+ $(,)?) => {
        (|| -> ::std::result::Result<$crate::ttooling::ToolRegistry, $crate::ttooling::ToolError> {
            let mut registry = $crate::ttooling::ToolRegistry::new();
            $(registry.register($tool?);)+
            Ok(registry)
        })()
    };
}
