use std::io::BufRead;

use regex::Captures;

use super::cap;
use crate::context::ExecutionContext;
use crate::value::{RuntimeError, Value};

const HELP_TEXT: &str = "\
Available commands:

BASIC OUTPUT:
- print \"hello world\" or display \"message\"
- print variableName (print variable values)
- display the value of variableName

MATH OPERATIONS (supports decimals and negative numbers):
- add 5 and 3, add 2.5 and -1.5
- subtract 2 from 10
- multiply 4 by 6
- divide 10 by 2
- calculate the square root of 16
- raise 2 to the power of 3
- generate a random number between 1 and 100
- find the minimum of 5, 2, 8, 1
- find the maximum of 5, 2, 8, 1
- calculate the average of 5, 2, 8, 1
- round 3.14159 to 2 decimal places

ADVANCED MATH:
- calculate the sine of 30
- calculate the cosine of 45
- calculate the tangent of 60
- calculate the natural log of 10
- calculate the log base 2 of 8
- calculate the absolute value of -15
- calculate the factorial of 5

VARIABLES:
- set myvar to \"hello\" or set num to 42
- create variable name with value 100
- check the type of myvar
- convert myvar to number

LISTS:
- create list mylist with 1, 2, 3
- create a list with apple, banana, cherry
- add 4 to list mylist
- add orange to the list
- show list mylist
- show the list

STRING OPERATIONS:
- make \"hello world\" uppercase
- make \"HELLO WORLD\" lowercase
- get the length of \"hello\"
- reverse \"hello\"
- replace \"old\" with \"new\" in \"hello old world\"
- split \"apple,banana,cherry\" by \",\"

DATE & TIME:
- get the current time
- get the current date
- get the current datetime
- add 7 days to today
- subtract 3 days from today

FILE OPERATIONS:
- save \"hello world\" to file.txt
- read the contents of file.txt
- create a CSV file data.csv with headers name, age, city
- add row John, 25, NYC to CSV data.csv
- read the CSV file data.csv
- save list mylist to data.json
- load list from data.json
- save data to backup.xml or save data to backup.yaml

DATABASE:
- create database \"mydata\"
- create table users with columns name, age integer
- insert into table users values John, 25
- select all from table users
- close database

WEB:
- get data from url \"https://example.com\"
- download from \"https://example.com/file\" to \"local.txt\"
- check if \"https://example.com\" is accessible

INPUT/OUTPUT:
- ask the user for their name
- get input for age

LOOPS:
- repeat 5 times: print \"hello\"
- for each item in list mylist do print item
- while counter is less than 10 do print counter
- count from 1 to 5 and print \"step\"

CONDITIONALS:
- if name equals \"John\" then print \"Hello John\"
- if age is greater than 18 then print \"Adult\"
- if age is less than 13 then print \"Child\"
- if message contains \"hello\" then print \"Greeting found\"
- if list mylist has 5 items then print \"List is full\"

FUNCTIONS:
- define function greet as print \"Hello there\"
- call function greet
- run greet

SESSION:
- save session to session.json
- load session from session.json
- list all variables
- delete variable myvar
- reset everything

HELP:
- help (show this message)";

impl ExecutionContext {
    /// Read one line from stdin into the `user_input` variable. EOF
    /// (closed stdin) leaves an empty answer rather than failing.
    pub(crate) fn get_user_input(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let prompt = cap(caps, 1).trim().to_string();
        self.emit_part(format!("Please enter {}: ", prompt));

        let mut answer = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| RuntimeError::new(format!("Input cancelled: {}", e)))?;
        let answer = answer.trim_end_matches(['\n', '\r']).to_string();

        self.emit(format!("You entered: {}", answer));
        self.variables
            .insert("user_input".to_string(), Value::Str(answer));
        Ok(format!("input(\"{}\")", prompt))
    }

    pub(crate) fn clear_screen(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        // ANSI clear plus home; harmless when redirected.
        self.emit_part("\x1b[2J\x1b[1;1H");
        self.emit("Screen cleared.");
        Ok("clear()".to_string())
    }

    pub(crate) fn show_help(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        self.emit(HELP_TEXT);
        Ok("help()".to_string())
    }
}
