//! Bean-name derivation and type-path helpers.

/// Derives the default bean name from a simple type identifier.
///
/// The first character is lowercased, unless the first two characters are
/// both uppercase, in which case the identifier is returned unchanged so that
/// acronyms survive.
///
/// ```rust
/// use beanstalk::decapitalize;
///
/// assert_eq!(decapitalize("UserService"), "userService");
/// assert_eq!(decapitalize("URLService"), "URLService");
/// assert_eq!(decapitalize("A"), "a");
/// ```
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = chars.clone().next()
        && first.is_uppercase()
        && second.is_uppercase()
    {
        return name.to_owned();
    }
    first.to_lowercase().chain(chars).collect()
}

/// Strips generic arguments from a full type name.
fn without_generics(type_name: &str) -> &str {
    match type_name.find('<') {
        Some(i) => &type_name[..i],
        None => type_name,
    }
}

/// Returns the last path segment of a full type name.
///
/// ```rust
/// use beanstalk::simple_type_name;
///
/// assert_eq!(simple_type_name("app::service::UserService"), "UserService");
/// assert_eq!(simple_type_name("Repository"), "Repository");
/// ```
pub fn simple_type_name(type_name: &str) -> &str {
    let path = without_generics(type_name);
    match path.rsplit_once("::") {
        Some((_, name)) => name,
        None => path,
    }
}

/// Returns the module part of a full type name, or `""` for unqualified names.
pub fn module_path_of(type_name: &str) -> &str {
    let path = without_generics(type_name);
    match path.rsplit_once("::") {
        Some((module, _)) => module,
        None => "",
    }
}

/// Tests whether `module` is `root` itself or one of its submodules. The
/// empty root contains every module.
pub(crate) fn is_under(module: &str, root: &str) -> bool {
    if root.is_empty() {
        return true;
    }
    match module.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}
