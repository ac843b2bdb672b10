//! The embedded C runtime emitted into every translation unit.
//!
//! Fixed fixtures (CONSOLE, string helpers, MATH, STRING, DATETIME,
//! RANDOM, FILECLS, the isa check) are stored as C text verbatim; the
//! per-element-type array runtime is stamped out from a descriptor table
//! so all seven element types get the same surface.

use crate::CGenerator;

/// Per-element-type array runtime descriptor.
struct ArrayTypeInfo {
    /// C struct name, e.g. `IntArray`.
    struct_name: &'static str,
    /// C element type, e.g. `int`.
    elem: &'static str,
    /// printf format for one element.
    fmt: &'static str,
    /// Value returned by `find` when no element matches.
    find_miss: &'static str,
    /// String elements compare through strcmp.
    string_elems: bool,
}

const ARRAY_TYPES: &[ArrayTypeInfo] = &[
    ArrayTypeInfo {
        struct_name: "IntArray",
        elem: "int",
        fmt: "%d",
        find_miss: "-1",
        string_elems: false,
    },
    ArrayTypeInfo {
        struct_name: "FloatArray",
        elem: "float",
        fmt: "%f",
        find_miss: "0.0f",
        string_elems: false,
    },
    ArrayTypeInfo {
        struct_name: "LongFloatArray",
        elem: "double",
        fmt: "%f",
        find_miss: "0.0",
        string_elems: false,
    },
    ArrayTypeInfo {
        struct_name: "LongIntArray",
        elem: "long long",
        fmt: "%lld",
        find_miss: "-1",
        string_elems: false,
    },
    ArrayTypeInfo {
        struct_name: "BoolArray",
        elem: "bool",
        fmt: "%d",
        find_miss: "false",
        string_elems: false,
    },
    ArrayTypeInfo {
        struct_name: "CharArray",
        elem: "char",
        fmt: "%c",
        find_miss: "'\\0'",
        string_elems: false,
    },
    ArrayTypeInfo {
        struct_name: "StringArray",
        elem: "char*",
        fmt: "%s",
        find_miss: "NULL",
        string_elems: true,
    },
];

const CONSOLE_RUNTIME: &str = r#"// CONSOLE class implementation
typedef struct {
    int dummy;  // Placeholder
} CONSOLE_t;

// ANSI color codes for terminal output
const char* ANSI_COLOR_RED = "\033[31m";
const char* ANSI_COLOR_GREEN = "\033[32m";
const char* ANSI_COLOR_YELLOW = "\033[33m";
const char* ANSI_COLOR_BLUE = "\033[34m";
const char* ANSI_COLOR_MAGENTA = "\033[35m";
const char* ANSI_COLOR_CYAN = "\033[36m";
const char* ANSI_COLOR_WHITE = "\033[37m";
const char* ANSI_COLOR_BLACK = "\033[30m";
const char* ANSI_COLOR_RESET = "\033[0m";
const char* ANSI_BOLD = "\033[1m";
const char* ANSI_UNDERLINE = "\033[4m";

void CONSOLE_Print(const char* str) {
    printf("%s\n", str);
}

void CONSOLE_PrintInteger(int val) {
    printf("%d\n", val);
}

void CONSOLE_PrintBoolean(bool val) {
    printf("%s\n", val ? "true" : "false");
}

void CONSOLE_PrintFloat(float val) {
    printf("%f\n", val);
}

// Read a line of input from the user
char* CONSOLE_Scan() {
    char* buffer = (char*)malloc(1024);
    if (fgets(buffer, 1024, stdin) != NULL) {
        // Remove trailing newline if present
        size_t len = strlen(buffer);
        if (len > 0 && buffer[len-1] == '\n') {
            buffer[len-1] = '\0';
        }
        return buffer;
    }
    return buffer;
}

int CONSOLE_ScanInteger() {
    int val;
    scanf("%d", &val);
    getchar(); // Consume newline
    return val;
}

float CONSOLE_ScanFloat() {
    float val;
    scanf("%f", &val);
    getchar(); // Consume newline
    return val;
}

bool CONSOLE_ScanBoolean() {
    char* input = CONSOLE_Scan();
    return (strcmp(input, "true") == 0 || strcmp(input, "1") == 0);
}

void CONSOLE_Clear() {
#ifdef _WIN32
    system("cls");
#else
    system("clear");
#endif
}

CONSOLE_t CONSOLE;
"#;

const STRING_HELPERS: &str = r#"// String helper functions
bool string_equals(const char* s1, const char* s2) {
    if (s1 == NULL || s2 == NULL) return s1 == s2;
    return strcmp(s1, s2) == 0;
}

bool string_less_than(const char* s1, const char* s2) {
    if (s1 == NULL) return s2 != NULL;
    if (s2 == NULL) return false;
    return strcmp(s1, s2) < 0;
}

bool string_greater_than(const char* s1, const char* s2) {
    if (s1 == NULL) return false;
    if (s2 == NULL) return s1 != NULL;
    return strcmp(s1, s2) > 0;
}

char* string_concat(const char* s1, const char* s2) {
    if (s1 == NULL) s1 = "";
    if (s2 == NULL) s2 = "";
    size_t len1 = strlen(s1);
    size_t len2 = strlen(s2);
    char* result = (char*)malloc(len1 + len2 + 1);
    strcpy(result, s1);
    strcat(result, s2);
    return result;
}

int string_length(const char* s) {
    return s ? strlen(s) : 0;
}

char* string_substring(const char* s, int start, int end) {
    if (!s) return "";
    int len = strlen(s);
    if (start < 0) start = 0;
    if (end > len) end = len;
    if (start >= end) return "";
    int sub_len = end - start;
    char* result = (char*)malloc(sub_len + 1);
    strncpy(result, s + start, sub_len);
    result[sub_len] = '\0';
    return result;
}

char* string_toUpper(const char* s) {
    if (!s) return "";
    int len = strlen(s);
    char* result = (char*)malloc(len + 1);
    for (int i = 0; i < len; i++) {
        result[i] = toupper(s[i]);
    }
    result[len] = '\0';
    return result;
}

char* string_toLower(const char* s) {
    if (!s) return "";
    int len = strlen(s);
    char* result = (char*)malloc(len + 1);
    for (int i = 0; i < len; i++) {
        result[i] = tolower(s[i]);
    }
    result[len] = '\0';
    return result;
}

char* string_replace(const char* s, const char* old, const char* new) {
    if (!s || !old || !new) {
        if (s) {
            char* copy = (char*)malloc(strlen(s) + 1);
            strcpy(copy, s);
            return copy;
        }
        return "";
    }
    int old_len = strlen(old);
    int new_len = strlen(new);
    int count = 0;
    const char* p = s;
    // Count occurrences
    while ((p = strstr(p, old)) != NULL) {
        count++;
        p += old_len;
    }
    if (count == 0) {
        char* copy = (char*)malloc(strlen(s) + 1);
        strcpy(copy, s);
        return copy;
    }
    // Allocate result
    int result_len = strlen(s) + count * (new_len - old_len);
    char* result = (char*)malloc(result_len + 1);
    char* dest = result;
    p = s;
    while (*p) {
        const char* match = strstr(p, old);
        if (match == NULL) {
            strcpy(dest, p);
            break;
        }
        // Copy up to match
        int prefix_len = match - p;
        strncpy(dest, p, prefix_len);
        dest += prefix_len;
        // Copy replacement
        strcpy(dest, new);
        dest += new_len;
        p = match + old_len;
    }
    *dest = '\0';
    return result;
}

char* string_trim(const char* s) {
    if (!s) return "";
    while (*s && isspace(*s)) s++;
    if (*s == 0) return "";
    const char* end = s + strlen(s) - 1;
    while (end > s && isspace(*end)) end--;
    int len = end - s + 1;
    char* result = (char*)malloc(len + 1);
    strncpy(result, s, len);
    result[len] = '\0';
    return result;
}

int string_toInt(const char* s) {
    return s ? atoi(s) : 0;
}

float string_toFloat(const char* s) {
    return s ? atof(s) : 0.0f;
}

char* int_toString(int val) {
    char* result = (char*)malloc(32);
    sprintf(result, "%d", val);
    return result;
}

char* float_toString(float val) {
    char* result = (char*)malloc(32);
    sprintf(result, "%f", val);
    return result;
}

float int_toFloat(int val) {
    return (float)val;
}

int float_toInteger(float val) {
    return (int)val;
}
"#;

const MATH_RUNTIME: &str = r#"// MATH class (static)
const double MATH_PI = 3.14159265358979323846;
const double MATH_E = 2.71828182845904523536;

int MATH_Min(int a, int b) {
    return (a < b) ? a : b;
}

int MATH_Max(int a, int b) {
    return (a > b) ? a : b;
}

int MATH_Absolute(int val) {
    return val < 0 ? -val : val;
}

double MATH_SquareRoot(double val) {
    return sqrt(val);
}

double MATH_Power(double base, double exp) {
    return pow(base, exp);
}

int MATH_Floor(double val) {
    return (int)floor(val);
}

int MATH_Ceil(double val) {
    return (int)ceil(val);
}

int MATH_Round(double val) {
    return (int)round(val);
}

double MATH_Sine(double val) {
    return sin(val);
}

double MATH_Cosine(double val) {
    return cos(val);
}

double MATH_Tangent(double val) {
    return tan(val);
}

double MATH_Random() {
    return (double)rand() / RAND_MAX;
}

int MATH_Clamp(int val, int min_val, int max_val) {
    if (val < min_val) return min_val;
    if (val > max_val) return max_val;
    return val;
}
"#;

const STRING_STATIC_RUNTIME: &str = r#"// STRING class (static)
char* STRING_Join(char** arr, int length, const char* delimiter) {
    if (!arr || length == 0) return "";
    int total_len = 0;
    int delim_len = delimiter ? strlen(delimiter) : 0;
    for (int i = 0; i < length; i++) {
        total_len += arr[i] ? strlen(arr[i]) : 0;
        if (i < length - 1) total_len += delim_len;
    }
    char* result = (char*)malloc(total_len + 1);
    result[0] = '\0';
    for (int i = 0; i < length; i++) {
        if (arr[i]) strcat(result, arr[i]);
        if (i < length - 1 && delimiter) strcat(result, delimiter);
    }
    return result;
}

bool STRING_Contains(const char* s, const char* search) {
    if (!s || !search) return false;
    return strstr(s, search) != NULL;
}

bool STRING_StartsWith(const char* s, const char* prefix) {
    if (!s || !prefix) return false;
    return strncmp(s, prefix, strlen(prefix)) == 0;
}

bool STRING_EndsWith(const char* s, const char* suffix) {
    if (!s || !suffix) return false;
    int s_len = strlen(s);
    int suffix_len = strlen(suffix);
    if (suffix_len > s_len) return false;
    return strcmp(s + s_len - suffix_len, suffix) == 0;
}

int STRING_Length(const char* s) {
    if (!s) return 0;
    return (int)strlen(s);
}
"#;

const DATETIME_RUNTIME: &str = r#"// DATETIME class (static)
long DATETIME_Now() {
    return (long)time(NULL);
}

int DATETIME_Year(long timestamp) {
    time_t t = (time_t)timestamp;
    struct tm* tm_info = localtime(&t);
    return tm_info->tm_year + 1900;
}

int DATETIME_Month(long timestamp) {
    time_t t = (time_t)timestamp;
    struct tm* tm_info = localtime(&t);
    return tm_info->tm_mon + 1;
}

int DATETIME_Day(long timestamp) {
    time_t t = (time_t)timestamp;
    struct tm* tm_info = localtime(&t);
    return tm_info->tm_mday;
}

int DATETIME_Hour(long timestamp) {
    time_t t = (time_t)timestamp;
    struct tm* tm_info = localtime(&t);
    return tm_info->tm_hour;
}

int DATETIME_Minute(long timestamp) {
    time_t t = (time_t)timestamp;
    struct tm* tm_info = localtime(&t);
    return tm_info->tm_min;
}

int DATETIME_Second(long timestamp) {
    time_t t = (time_t)timestamp;
    struct tm* tm_info = localtime(&t);
    return tm_info->tm_sec;
}
"#;

const RANDOM_RUNTIME: &str = r#"// RANDOM class (static)
int RANDOM_Integer(int min, int max) {
    return min + (rand() % (max - min + 1));
}

float RANDOM_Float(float min, float max) {
    float scale = rand() / (float) RAND_MAX;
    return min + scale * (max - min);
}

bool RANDOM_Boolean() {
    return rand() % 2 == 0;
}

void RANDOM_Seed(int seed) {
    srand(seed);
}

char RANDOM_Character() {
    // Random printable ASCII character (33-126)
    return (char)(33 + (rand() % 94));
}
"#;

const FILECLS_RUNTIME: &str = r#"// FILE class (static) - using FILECLS to avoid conflict with C FILE
char* FILECLS_Read(const char* path) {
    FILE* f = fopen(path, "r");
    if (!f) return NULL;
    fseek(f, 0, SEEK_END);
    long size = ftell(f);
    fseek(f, 0, SEEK_SET);
    char* content = (char*)malloc(size + 1);
    fread(content, 1, size, f);
    content[size] = '\0';
    fclose(f);
    return content;
}

bool FILECLS_Write(const char* path, const char* content) {
    FILE* f = fopen(path, "w");
    if (!f) return false;
    fprintf(f, "%s", content);
    fclose(f);
    return true;
}

bool FILECLS_Append(const char* path, const char* content) {
    FILE* f = fopen(path, "a");
    if (!f) return false;
    fprintf(f, "%s", content);
    fclose(f);
    return true;
}

bool FILECLS_Exists(const char* path) {
    FILE* f = fopen(path, "r");
    if (f) {
        fclose(f);
        return true;
    }
    return false;
}

bool FILECLS_Delete(const char* path) {
    return remove(path) == 0;
}
"#;

const ISA_RUNTIME: &str = r#"// Helper for 'isa' type checking (supports multiple inheritance)
int _isa_check(const char* obj_class, const char* p0, const char* p1, const char* p2, const char* p3, const char* target_class) {
    if (strcmp(obj_class, target_class) == 0) return 1;
    if (p0 && strcmp(p0, target_class) == 0) return 1;
    if (p1 && strcmp(p1, target_class) == 0) return 1;
    if (p2 && strcmp(p2, target_class) == 0) return 1;
    if (p3 && strcmp(p3, target_class) == 0) return 1;
    return 0;
}
"#;

const ARRAY_STATIC_RUNTIME: &str = r#"// ARRAY class (static) - works with IntArray
int ARRAY_Length(IntArray* arr) {
    return arr ? arr->length : 0;
}

bool ARRAY_Contains(IntArray* arr, int element) {
    if (!arr) return false;
    for (int i = 0; i < arr->length; i++) {
        if (arr->data[i] == element) return true;
    }
    return false;
}

int ARRAY_IndexOf(IntArray* arr, int element) {
    if (!arr) return -1;
    for (int i = 0; i < arr->length; i++) {
        if (arr->data[i] == element) return i;
    }
    return -1;
}
"#;

impl<'p> CGenerator<'p> {
    /// Emits the fixed library fixtures.
    pub(crate) fn emit_library_runtime(&mut self) {
        self.emit("// ========================================".to_string());
        self.emit("// STANDARD LIBRARY IMPLEMENTATION".to_string());
        self.emit("// ========================================".to_string());
        self.emit_blank();

        self.emit_raw(CONSOLE_RUNTIME);
        self.emit_raw(STRING_HELPERS);
        self.emit_raw(MATH_RUNTIME);
        self.emit_raw(STRING_STATIC_RUNTIME);
        self.emit_raw(DATETIME_RUNTIME);
        self.emit_raw(RANDOM_RUNTIME);
        self.emit_raw(FILECLS_RUNTIME);
        self.emit_raw(ISA_RUNTIME);
    }

    /// Emits the per-element-type array runtime for all seven element
    /// types, plus the ARRAY static helpers.
    pub(crate) fn emit_array_runtime(&mut self) {
        self.emit("// Array helper structures".to_string());
        self.emit_blank();

        for (i, info) in ARRAY_TYPES.iter().enumerate() {
            self.emit_array_type(info);

            // the integer variant doubles as the ARRAY fixture's backing type
            if i == 0 {
                self.emit_raw(ARRAY_STATIC_RUNTIME);
            }
        }
    }

    fn emit_array_type(&mut self, info: &ArrayTypeInfo) {
        let name = info.struct_name;
        let elem = info.elem;

        let (sort_cmp, unique_cmp) = if info.string_elems {
            (
                "strcmp(result->data[j], result->data[j + 1]) > 0".to_string(),
                "strcmp(result->data[j], arr->data[i]) == 0".to_string(),
            )
        } else {
            (
                "result->data[j] > result->data[j + 1]".to_string(),
                "result->data[j] == arr->data[i]".to_string(),
            )
        };

        let text = format!(
            r#"struct {name}_s {{
    {elem}* data;
    int length;
    int capacity;
}};

{name}* {name}_new(int capacity) {{
    {name}* arr = GC_MALLOC(sizeof({name}));
    arr->data = GC_MALLOC(sizeof({elem}) * capacity);
    arr->length = 0;
    arr->capacity = capacity;
    return arr;
}}

{name}* {name}_from_literal({elem}* values, int length) {{
    {name}* arr = {name}_new(length);
    memcpy(arr->data, values, sizeof({elem}) * length);
    arr->length = length;
    return arr;
}}

void {name}_append({name}* arr, {elem} value) {{
    if (arr->length >= arr->capacity) {{
        arr->capacity *= 2;
        {elem}* new_data = GC_MALLOC(sizeof({elem}) * arr->capacity);
        memcpy(new_data, arr->data, sizeof({elem}) * arr->length);
        arr->data = new_data;
    }}
    arr->data[arr->length++] = value;
}}

{name}* {name}_map({name}* arr, {elem} (*func)({elem})) {{
    {name}* result = {name}_new(arr->length);
    for (int i = 0; i < arr->length; i++) {{
        result->data[result->length++] = func(arr->data[i]);
    }}
    return result;
}}

{name}* {name}_filter({name}* arr, int (*func)({elem})) {{
    {name}* result = {name}_new(arr->length);
    for (int i = 0; i < arr->length; i++) {{
        if (func(arr->data[i])) {{
            result->data[result->length++] = arr->data[i];
        }}
    }}
    return result;
}}

{elem} {name}_reduce({name}* arr, {elem} (*func)({elem}, {elem}), {elem} initial) {{
    {elem} result = initial;
    for (int i = 0; i < arr->length; i++) {{
        result = func(result, arr->data[i]);
    }}
    return result;
}}

{name}* {name}_sort({name}* arr) {{
    {name}* result = {name}_new(arr->length);
    memcpy(result->data, arr->data, sizeof({elem}) * arr->length);
    result->length = arr->length;
    for (int i = 0; i < result->length - 1; i++) {{
        for (int j = 0; j < result->length - i - 1; j++) {{
            if ({sort_cmp}) {{
                {elem} temp = result->data[j];
                result->data[j] = result->data[j + 1];
                result->data[j + 1] = temp;
            }}
        }}
    }}
    return result;
}}

{name}* {name}_unique({name}* arr) {{
    {name}* result = {name}_new(arr->length);
    for (int i = 0; i < arr->length; i++) {{
        int found = 0;
        for (int j = 0; j < result->length; j++) {{
            if ({unique_cmp}) {{
                found = 1;
                break;
            }}
        }}
        if (!found) {{
            result->data[result->length++] = arr->data[i];
        }}
    }}
    return result;
}}

{elem} {name}_find({name}* arr, int (*func)({elem})) {{
    for (int i = 0; i < arr->length; i++) {{
        if (func(arr->data[i])) {{
            return arr->data[i];
        }}
    }}
    return {find_miss};
}}

void {name}_print({name}* arr) {{
    printf("[");
    for (int i = 0; i < arr->length; i++) {{
        printf("{fmt}", arr->data[i]);
        if (i < arr->length - 1) printf(", ");
    }}
    printf("]\n");
}}

// Array concatenation
{name}* {name}_concat({name}* arr1, {name}* arr2) {{
    if (!arr1) return arr2;
    if (!arr2) return arr1;
    {name}* result = {name}_new(arr1->length + arr2->length);
    memcpy(result->data, arr1->data, sizeof({elem}) * arr1->length);
    memcpy(result->data + arr1->length, arr2->data, sizeof({elem}) * arr2->length);
    result->length = arr1->length + arr2->length;
    return result;
}}
"#,
            name = name,
            elem = elem,
            sort_cmp = sort_cmp,
            unique_cmp = unique_cmp,
            find_miss = info.find_miss,
            fmt = info.fmt,
        );

        self.emit_raw(&text);
    }
}
