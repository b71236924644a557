use std::collections::HashSet;

use super::Resolver;
use crate::consts::RESOLVE_MAX_HIERARCHY_STEPS;
use crate::model::{ClassId, FieldId, JavaMethod, JavaType, MethodId};

/// Inherited member seen through the class it was queried on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delegate<Id> {
    pub original: Id,
    /// Class whose perspective type-bearing queries use
    pub viewing: ClassId,
}

/// Member returned by a class member query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member<Id> {
    Declared(Id),
    Inherited(Delegate<Id>),
}

impl<Id: Copy> Member<Id> {
    /// Id of the underlying declaration
    pub fn id(&self) -> Id {
        match self {
            Member::Declared(id) => *id,
            Member::Inherited(delegate) => delegate.original,
        }
    }

    pub fn viewing(&self) -> Option<ClassId> {
        match self {
            Member::Declared(_) => None,
            Member::Inherited(delegate) => Some(delegate.viewing),
        }
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Member::Inherited(_))
    }
}

impl<'a> Resolver<'a> {
    /// Methods of `class`; with `inherited`, members of all supertypes not
    /// overridden on the way, keyed by name and erased parameter types.
    pub fn methods(&self, class: ClassId, inherited: bool) -> Vec<Member<MethodId>> {
        if !inherited {
            return self.model.class(class).methods.iter().copied().map(Member::Declared).collect();
        }
        let mut seen = HashSet::new();
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        self.collect_methods(class, class, &mut seen, &mut visited, &mut out);
        out
    }

    /// Fields of `class`; with `inherited`, fields of supertypes not hidden by name
    pub fn fields(&self, class: ClassId, inherited: bool) -> Vec<Member<FieldId>> {
        if !inherited {
            return self.model.class(class).fields.iter().copied().map(Member::Declared).collect();
        }
        let mut seen = HashSet::new();
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        self.collect_fields(class, class, &mut seen, &mut visited, &mut out);
        out
    }

    /// Name plus erased parameter types as seen from `viewing`
    pub fn signature_key(&self, method: &JavaMethod, viewing: ClassId) -> String {
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| self.to_java_type(&p.type_ref, Some(viewing)).erased().erased_value())
            .collect();
        format!("{}({})", method.name, params.join(","))
    }

    fn collect_methods(
        &self,
        current: ClassId,
        root: ClassId,
        seen: &mut HashSet<String>,
        visited: &mut HashSet<ClassId>,
        out: &mut Vec<Member<MethodId>>,
    ) {
        if !visited.insert(current) || visited.len() > RESOLVE_MAX_HIERARCHY_STEPS {
            return;
        }
        for &id in &self.model.class(current).methods {
            let method = self.model.method(id);
            if method.is_private() {
                continue;
            }
            if seen.insert(self.signature_key(method, root)) {
                out.push(wrap(id, current, root));
            }
        }
        for supertype in self.supertypes_of(current) {
            self.collect_methods(supertype, root, seen, visited, out);
        }
    }

    fn collect_fields(
        &self,
        current: ClassId,
        root: ClassId,
        seen: &mut HashSet<String>,
        visited: &mut HashSet<ClassId>,
        out: &mut Vec<Member<FieldId>>,
    ) {
        if !visited.insert(current) || visited.len() > RESOLVE_MAX_HIERARCHY_STEPS {
            return;
        }
        for &id in &self.model.class(current).fields {
            let field = self.model.field(id);
            if field.is_private() {
                continue;
            }
            if seen.insert(field.name.clone()) {
                out.push(wrap(id, current, root));
            }
        }
        for supertype in self.supertypes_of(current) {
            self.collect_fields(supertype, root, seen, visited, out);
        }
    }

    /// Return type of a method member; `None` for constructors
    pub fn member_return_type(&self, member: Member<MethodId>) -> Option<JavaType> {
        let method = self.model.method(member.id());
        let viewing = member.viewing().unwrap_or(method.declaring_class);
        method
            .return_type
            .as_ref()
            .map(|tref| self.to_java_type(tref, Some(viewing)))
    }

    pub fn member_parameter_types(&self, member: Member<MethodId>) -> Vec<JavaType> {
        let method = self.model.method(member.id());
        let viewing = member.viewing().unwrap_or(method.declaring_class);
        method
            .parameters
            .iter()
            .map(|p| self.to_java_type(&p.type_ref, Some(viewing)))
            .collect()
    }

    pub fn member_field_type(&self, member: Member<FieldId>) -> JavaType {
        let field = self.model.field(member.id());
        let viewing = member.viewing().unwrap_or(field.declaring_class);
        self.to_java_type(&field.type_ref, Some(viewing))
    }
}

fn wrap<Id>(id: Id, current: ClassId, root: ClassId) -> Member<Id> {
    if current == root {
        Member::Declared(id)
    } else {
        Member::Inherited(Delegate {
            original: id,
            viewing: root,
        })
    }
}
