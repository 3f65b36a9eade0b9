//! Documentation content for the resfilter CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Transforms,
    Placeholders,
    Baseline,
    Mutations,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "operators" | "ops" | "comparisons" => Some(Self::Operators),
            "transforms" | "transform" | "functions" => Some(Self::Transforms),
            "placeholders" | "placeholder" | "fuzz" => Some(Self::Placeholders),
            "baseline" | "bbb" => Some(Self::Baseline),
            "mutations" | "mutation" | "assign" => Some(Self::Mutations),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"RESFILTER DOCUMENTATION

resfilter evaluates filter expressions against fuzzing results. A filter
decides whether a result is shown, and may rewrite the result on the way.

DOCUMENTATION CATEGORIES

  syntax            Clauses, connectives, literals and field paths
  operators         Comparison and assignment operators
  transforms        |operator() calls: encode, replace, gregex, unique, ...
  placeholders      FUZZ, FUZ2Z..FUZ9Z and FUZZ[field]
  baseline          Comparing against a baseline result with BBB
  mutations         Rewriting results with :=, =+ and =-

QUICK REFERENCE

  c=200 and l>5             Code 200 with more than five lines
  FUZZ~'admin'              Payload contains 'admin' (case-insensitive)
  c!=BBB                    Code differs from the baseline's
  c=XXX                     The request failed
  FUZZ|unique()             First time this payload is seen
  url=+'?debug=1'           Append to a field

Run 'resfilter doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Transforms) => Ok(TRANSFORMS_DOC),
        Some(DocCategory::Placeholders) => Ok(PLACEHOLDERS_DOC),
        Some(DocCategory::Baseline) => Ok(BASELINE_DOC),
        Some(DocCategory::Mutations) => Ok(MUTATIONS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

A filter is a list of clauses joined by 'and' / 'or':

  clause (and|or) clause (and|or) clause ...

'and' and 'or' have the same precedence and are applied left to right,
so 'a or b and c' means '(a or b) and c'. Use parentheses to group.

'not' negates the clause right after it:

  not c=404 and l>10        (not c=404) and l>10
  not (c=404 and l>10)      negates the whole group

Every clause is evaluated, even when the outcome is already decided.
Rewrites and unique() bookkeeping therefore always happen.

LITERALS

  200                       Integer (digits only)
  'text'                    String, single-quoted
  'it\'s'                   \' and \\ are escapes; other backslashes are kept

FIELDS

  c, code                   Status code
  l, lines                  Line count
  w, words                  Word count
  h, chars                  Character count
  i, index                  Position in the result stream
  headers.Server            Dotted path into any other attribute
  redirects.0               Numeric segments index sequences

A clause with no operator is true when its value is truthy:
non-empty strings and collections, non-zero numbers, true.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

COMPARISON

  =  ==                     Equal (compared as text, so c='200' holds)
  !=                        Not equal
  <  >  <=  >=              Ordering (numbers, or strings lexically)
  =~                        Regex match; '.' matches newlines, ^/$ per line
  ~                         Contains, case-insensitive
  !~                        Does not contain, case-insensitive

Containment on sequences checks every item; on mappings it checks every
key and value.

ASSIGNMENT

  :=                        Replace the field's value
  =+                        Append to the field's value
  =-                        Prepend to the field's value

Assignments always evaluate to true. See 'resfilter doc mutations'.

SPECIAL RIGHT-HAND SIDES

  BBB                       The baseline's value for the same attribute
  XXX                       The error status code (-1)
"#;

const TRANSFORMS_DOC: &str = r#"TRANSFORMS

Any value may carry one operator call: value|name(args). Short and long
names are interchangeable.

  un()  unquote()           Percent-decode
  e('enc')  encode('enc')   Encode with a named encoder
  d('enc')  decode('enc')   Decode with a named encoder
  r('a','b')  replace(...)  Replace every 'a' with 'b'
  upper()                   Upper-case
  l()  lower()              Lower-case
  gre('re')  gregex('re')   First capture group of the regex, '' if no match
  sw('p')  startswith('p')  Whether the trimmed value starts with 'p'
  u()  unique()             True the first time a value is seen here

ENCODERS

  urlencode                 Percent-encoding
  double_urlencode          Percent-encoding applied twice
  base64                    Standard base64
  hexlify                   Lower-case hex of the UTF-8 bytes
  none                      Unchanged

Run 'resfilter encoders' to list the registered encoders.

UNIQUE

unique() remembers values per call site, so two unique() calls in the
same filter track separate sets. Values are remembered across results
until the filter's cache is reset.

  FUZZ|unique()             Hide repeated payloads
  url|unique()              Hide repeated URLs
"#;

const PLACEHOLDERS_DOC: &str = r#"PLACEHOLDERS

  FUZZ                      First payload value
  FUZ2Z .. FUZ9Z            Second to ninth payload values

Referring to a payload the result does not have is an error.

STRUCTURED PAYLOADS

When a payload is itself a previous result, project into it:

  FUZZ[c]=200               The previous result's code
  FUZZ[headers.Server]      A nested field
  FUZZ[url|lower()]         Projection followed by one operator
  FUZZ[|unique()]           Operator on the whole payload

Run 'resfilter placeholders <FILTER>' to list the placeholders a filter uses.
"#;

const BASELINE_DOC: &str = r#"BASELINE

BBB stands for the baseline result's value for the attribute on the
left-hand side:

  c!=BBB                    Code differs from the baseline code
  l=BBB                     Same line count
  h>BBB                     More characters than the baseline

The shorthand and long names (c/code, l/lines, w/words, h/chars,
i/index) select the attribute. Any other left-hand side compares
against the baseline's first payload value:

  FUZZ!=BBB

Using BBB with no baseline set is an error. Pass one with --baseline.
"#;

const MUTATIONS_DOC: &str = r#"MUTATIONS

Assignments rewrite the result being filtered and always evaluate to
true, so they combine freely with other clauses:

  url:='http://localhost/'            Replace
  url=+'?debug=1'                     Append (string concatenation)
  url=-'/v2'                          Prepend
  FUZZ[tag]:='seen' and c=200         Rewrite, then filter on code

The right-hand side may carry an operator call:

  url:=url|replace('http','https')

Numbers add instead of concatenating; sequences extend.
Rewritten results are what 'resfilter check' prints.
"#;
