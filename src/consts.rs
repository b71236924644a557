// Global safety caps to prevent pathological or infinite loops

// Resolve: hierarchy walks (supertype chains, member aggregation, generics substitution)
pub const RESOLVE_MAX_HIERARCHY_STEPS: usize = 200_000;
// Resolve: nesting of type-variable substitutions before falling back to the erasure
pub const RESOLVE_MAX_SUBSTITUTION_DEPTH: usize = 64;

/// Top type used as the erasure of an unbounded type variable
pub const OBJECT: &str = "java.lang.Object";

/// Implicitly imported package
pub const JAVA_LANG: &str = "java.lang";

/// Primitive type keywords, plus `void`
pub const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

// Well-known simple names from java.lang
pub const JAVA_LANG_SIMPLE_TYPES: &[&str] = &[
    "String", "Object", "Throwable", "Exception", "RuntimeException", "Error",
    "Cloneable", "Comparable", "Iterable", "Runnable", "CharSequence", "Enum",
    "Record", "Class", "ClassLoader", "Thread", "ThreadLocal", "System", "Math",
    "StringBuilder", "StringBuffer", "Number", "Integer", "Long", "Float",
    "Double", "Boolean", "Character", "Short", "Byte", "Void",
    "AutoCloseable", "Override", "Deprecated", "SuppressWarnings",
    "FunctionalInterface", "SafeVarargs", "IllegalArgumentException",
    "IllegalStateException", "NullPointerException", "UnsupportedOperationException",
    "IndexOutOfBoundsException", "ClassCastException", "ArithmeticException",
    "CloneNotSupportedException", "InterruptedException",
];

pub const JAVA_UTIL_SIMPLE_TYPES: &[&str] = &[
    "Collection", "List", "ArrayList", "LinkedList", "Set", "HashSet",
    "LinkedHashSet", "TreeSet", "SortedSet", "Map", "HashMap", "LinkedHashMap",
    "TreeMap", "SortedMap", "Queue", "Deque", "ArrayDeque", "Iterator",
    "Comparator", "Collections", "Arrays", "Objects", "Optional", "Date",
    "Properties", "Random", "Scanner", "UUID",
];

pub const JAVA_IO_SIMPLE_TYPES: &[&str] = &[
    "Serializable", "Closeable", "File", "InputStream", "OutputStream", "Reader",
    "Writer", "IOException", "UncheckedIOException", "PrintStream",
    "FileNotFoundException",
];
