use beanstalk::{ParseScopeError, Scope, decapitalize, module_path_of, simple_type_name};

#[test]
fn test_decapitalize() {
    assert_eq!(decapitalize("UserService"), "userService");
    assert_eq!(decapitalize("Repository"), "repository");
    assert_eq!(decapitalize("URLService"), "URLService");
    assert_eq!(decapitalize("IO"), "IO");
    assert_eq!(decapitalize("A"), "a");
    assert_eq!(decapitalize("already"), "already");
    assert_eq!(decapitalize(""), "");
}

#[test]
fn test_decapitalize_non_ascii() {
    assert_eq!(decapitalize("École"), "école");
    assert_eq!(decapitalize("ÉC"), "ÉC");
}

#[test]
fn test_simple_type_name() {
    assert_eq!(simple_type_name("app::beans::UserService"), "UserService");
    assert_eq!(simple_type_name("Clock"), "Clock");
    assert_eq!(
        simple_type_name("app::Holder<alloc::string::String>"),
        "Holder"
    );
}

#[test]
fn test_module_path_of() {
    assert_eq!(module_path_of("app::beans::UserService"), "app::beans");
    assert_eq!(module_path_of("Clock"), "");
    assert_eq!(
        module_path_of("app::Holder<alloc::vec::Vec<u8>>"),
        "app"
    );
    assert_eq!(
        module_path_of(std::any::type_name::<Scope>()),
        "beanstalk::bean"
    );
}

#[test]
fn test_scope() {
    assert_eq!("singleton".parse::<Scope>(), Ok(Scope::Singleton));
    assert_eq!("prototype".parse::<Scope>(), Ok(Scope::Prototype));
    assert_eq!(
        "Prototype".parse::<Scope>(),
        Err(ParseScopeError("Prototype".to_owned()))
    );
    assert_eq!(
        "request".parse::<Scope>(),
        Err(ParseScopeError("request".to_owned()))
    );
    assert_eq!(Scope::default(), Scope::Singleton);
    assert_eq!(Scope::Prototype.to_string(), "prototype");
}
