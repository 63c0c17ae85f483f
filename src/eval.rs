// ABOUTME: Tree-walking evaluator that interprets the AST against an environment

use crate::ast::{BinOp, Expr, LogicalOp, Program, Stmt, UnaryOp};
use crate::env::Environment;
use crate::include::Includer;
use crate::signal::Signal;
use crate::value::{values_equal, Caller, ClassData, FunctionData, InstanceData, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Owns the global environment, the built-in registry, and the set of
/// already-included paths for the lifetime of an interpreter session. The
/// REPL reuses one instance across lines.
pub struct Evaluator {
    pub globals: Rc<Environment>,
    includer: Includer,
}

impl Evaluator {
    pub fn new() -> Self {
        let globals = Environment::new();
        crate::builtins::register(&globals);
        Evaluator {
            globals,
            includer: Includer::new(),
        }
    }

    /// Runs a whole program in the global environment, as the file runner
    /// and each REPL line do.
    pub fn run(&mut self, program: &Program) -> Value {
        let mut result = Value::Nil;
        let globals = self.globals.clone();
        for stmt in program {
            let (value, signal) = self.exec_stmt(stmt, &globals);
            result = value;
            if !signal.is_none() {
                break;
            }
        }
        result
    }

    fn exec_block(&mut self, stmts: &[Stmt], env: &Rc<Environment>) -> (Value, Signal) {
        let mut result = Value::Nil;
        for stmt in stmts {
            let (value, signal) = self.exec_stmt(stmt, env);
            result = value;
            if !signal.is_none() {
                return (result, signal);
            }
        }
        (result, Signal::None)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Rc<Environment>) -> (Value, Signal) {
        match stmt {
            Stmt::Let { name, value } => {
                let v = self.eval(value, env);
                env.define(name.clone(), v, false);
                (Value::Nil, Signal::None)
            }
            Stmt::Const { name, value } => {
                let v = self.eval(value, env);
                env.define(name.clone(), v, true);
                (Value::Nil, Signal::None)
            }
            Stmt::FnDecl { name, params, body } => {
                let func = Value::Function(Rc::new(FunctionData {
                    name: Some(name.clone()),
                    params: params.clone(),
                    body: body.clone(),
                    closure: env.clone(),
                }));
                env.define(name.clone(), func, false);
                (Value::Nil, Signal::None)
            }
            Stmt::ClassDecl { name, methods } => {
                let mut method_map = IndexMap::new();
                for (mname, params, body) in methods {
                    method_map.insert(
                        mname.clone(),
                        Rc::new(FunctionData {
                            name: Some(mname.clone()),
                            params: params.clone(),
                            body: body.clone(),
                            closure: env.clone(),
                        }),
                    );
                }
                let class = Value::Class(Rc::new(ClassData {
                    name: name.clone(),
                    methods: method_map,
                }));
                env.define(name.clone(), class, false);
                (Value::Nil, Signal::None)
            }
            Stmt::If { branches, else_branch } => {
                for (cond, body) in branches {
                    if self.eval(cond, env).is_truthy() {
                        return self.exec_block(body, env);
                    }
                }
                match else_branch {
                    Some(body) => self.exec_block(body, env),
                    None => (Value::Nil, Signal::None),
                }
            }
            Stmt::While { cond, body } => {
                while self.eval(cond, env).is_truthy() {
                    let (_, signal) = self.exec_block(body, env);
                    match signal {
                        Signal::Break => break,
                        Signal::Continue | Signal::None => continue,
                        other => return (Value::Nil, other),
                    }
                }
                (Value::Nil, Signal::None)
            }
            Stmt::For { var, iterable, body } => {
                let iter_val = self.eval(iterable, env);
                let items = match iter_val {
                    Value::List(items) => items,
                    _ => {
                        eprintln!("runtime error: for-in requires a list, loop skipped");
                        return (Value::Nil, Signal::None);
                    }
                };
                for item in items {
                    let child = Environment::child(env.clone());
                    child.define(var.clone(), item, false);
                    let (_, signal) = self.exec_block(body, &child);
                    match signal {
                        Signal::Break => break,
                        Signal::Continue | Signal::None => continue,
                        other => return (Value::Nil, other),
                    }
                }
                (Value::Nil, Signal::None)
            }
            Stmt::Try { body, catch, finally } => {
                let (mut result, mut signal) = self.exec_block(body, env);
                if let (Signal::Throw(message), Some((bound, cbody))) = (&signal, catch) {
                    let child = Environment::child(env.clone());
                    if let Some(name) = bound {
                        child.define(name.clone(), Value::String(message.clone()), false);
                    }
                    let (cresult, csignal) = self.exec_block(cbody, &child);
                    result = cresult;
                    signal = csignal;
                }
                if let Some(fbody) = finally {
                    let (_, fsignal) = self.exec_block(fbody, env);
                    if !fsignal.is_none() {
                        signal = fsignal;
                    }
                }
                (result, signal)
            }
            Stmt::Throw(expr) => {
                let v = self.eval(expr, env);
                (Value::Nil, Signal::Throw(v.to_string()))
            }
            Stmt::Return(expr) => {
                let v = match expr {
                    Some(e) => self.eval(e, env),
                    None => Value::Nil,
                };
                (Value::Nil, Signal::Return(v))
            }
            Stmt::Break => (Value::Nil, Signal::Break),
            Stmt::Continue => (Value::Nil, Signal::Continue),
            Stmt::Include(expr) => {
                let path_val = self.eval(expr, env);
                let path = path_val.to_string();
                match self.includer.resolve(&path) {
                    Ok(Some(resolved)) => match std::fs::read_to_string(&resolved) {
                        Ok(src) => match crate::parser::parse(&src) {
                            Ok(program) => {
                                self.run(&program);
                            }
                            Err(e) => eprintln!("include error: {}: {}", resolved, e),
                        },
                        Err(e) => eprintln!("include error: {}: {}", resolved, e),
                    },
                    Ok(None) => {}
                    Err(e) => eprintln!("include error: {}", e),
                }
                (Value::Nil, Signal::None)
            }
            Stmt::Expr(expr) => (self.eval(expr, env), Signal::None),
        }
    }

    fn eval(&mut self, expr: &Expr, env: &Rc<Environment>) -> Value {
        match expr {
            Expr::Number(n) => Value::Number(*n),
            Expr::Str(s) => Value::String(s.clone()),
            Expr::Bool(b) => Value::Bool(*b),
            Expr::Nil => Value::Nil,
            Expr::SelfExpr => env.get("self").unwrap_or_else(|| {
                eprintln!("runtime error: 'self' used outside a method");
                Value::Nil
            }),
            Expr::Variable(name) => env.get(name).unwrap_or_else(|| {
                eprintln!("runtime error: undefined symbol '{}'", name);
                Value::Nil
            }),
            Expr::List(items) => {
                Value::List(items.iter().map(|e| self.eval(e, env)).collect())
            }
            Expr::Map(entries) => {
                let mut map = IndexMap::new();
                for (k, v) in entries {
                    map.insert(k.clone(), self.eval(v, env));
                }
                Value::Map(map)
            }
            Expr::Function { name, params, body } => Value::Function(Rc::new(FunctionData {
                name: name.clone(),
                params: params.clone(),
                body: body.clone(),
                closure: env.clone(),
            })),
            Expr::New { class, args } => self.eval_new(class, args, env),
            Expr::Call { callee, args } => self.eval_call(callee, args, env),
            Expr::Index { target, index } => {
                let t = self.eval(target, env);
                let i = self.eval(index, env);
                self.eval_index(&t, &i)
            }
            Expr::Attribute { target, name } => {
                let t = self.eval(target, env);
                self.eval_attribute(&t, name)
            }
            Expr::Assign { target, value } => {
                let v = self.eval(value, env);
                self.assign_to(target, v.clone(), env);
                v
            }
            Expr::CompoundAssign { target, op, value } => {
                let current = self.eval(target, env);
                let rhs = self.eval(value, env);
                let combined = self.apply_binop(*op, &current, &rhs);
                self.assign_to(target, combined.clone(), env);
                combined
            }
            Expr::IncDec { target, prefix, increment } => {
                let current = self.eval(target, env);
                let delta = if *increment { 1.0 } else { -1.0 };
                let updated = Value::Number(current.as_number() + delta);
                self.assign_to(target, updated.clone(), env);
                if *prefix {
                    updated
                } else {
                    current
                }
            }
            Expr::Binary { op, left, right } => {
                let l = self.eval(left, env);
                let r = self.eval(right, env);
                self.apply_binop(*op, &l, &r)
            }
            Expr::Unary { op, operand } => {
                let v = self.eval(operand, env);
                match op {
                    UnaryOp::Neg => Value::Number(-v.as_number()),
                    UnaryOp::Not => Value::Bool(!v.is_truthy()),
                    UnaryOp::BitNot => Value::Number(!(v.as_number() as i64) as f64),
                }
            }
            Expr::Logical { op, left, right } => {
                // Both sides are always evaluated; the language does not
                // short-circuit `and`/`or`.
                let l = self.eval(left, env);
                let r = self.eval(right, env);
                match op {
                    LogicalOp::And => Value::Bool(l.is_truthy() && r.is_truthy()),
                    LogicalOp::Or => Value::Bool(l.is_truthy() || r.is_truthy()),
                }
            }
        }
    }

    fn eval_new(&mut self, class_name: &str, args: &[Expr], env: &Rc<Environment>) -> Value {
        let class = match env.get(class_name) {
            Some(Value::Class(c)) => c,
            _ => {
                eprintln!("runtime error: unknown class '{}'", class_name);
                return Value::Nil;
            }
        };
        let instance = Rc::new(RefCell::new(InstanceData {
            class: class.clone(),
            fields: IndexMap::new(),
        }));
        let arg_values: Vec<Value> = args.iter().map(|a| self.eval(a, env)).collect();
        if let Some(init) = class.methods.get("__init__") {
            self.call_bound_method(init.clone(), Value::Instance(instance.clone()), &arg_values);
        }
        Value::Instance(instance)
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr], env: &Rc<Environment>) -> Value {
        let callee_val = self.eval(callee, env);
        let arg_values: Vec<Value> = args.iter().map(|a| self.eval(a, env)).collect();
        self.call_value(&callee_val, &arg_values)
    }

    pub fn call_value(&mut self, callee: &Value, args: &[Value]) -> Value {
        match callee {
            Value::Native(native) => {
                let native = native.clone();
                match (native.func)(args, self) {
                    Ok(v) => v,
                    Err(e) => {
                        eprintln!("runtime error: {}", e);
                        Value::Nil
                    }
                }
            }
            Value::Function(func) => self.call_function(func.clone(), args),
            _ => {
                eprintln!("runtime error: value is not callable");
                Value::Nil
            }
        }
    }

    fn call_function(&mut self, func: Rc<FunctionData>, args: &[Value]) -> Value {
        let call_env = Environment::child(func.closure.clone());
        for (i, param) in func.params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or(Value::Nil);
            call_env.define(param.clone(), value, false);
        }
        let (result, signal) = self.exec_block(&func.body, &call_env);
        match signal {
            Signal::Return(v) => v,
            _ => result,
        }
    }

    /// Packages an instance and a method into a callable whose closure
    /// extends the method's definition-time closure with `self` bound, then
    /// invokes it directly. Used both by `new` (for `__init__`) and by
    /// attribute access (for `instance.method`, which yields this same
    /// bound-function value without calling it).
    fn call_bound_method(&mut self, method: Rc<FunctionData>, receiver: Value, args: &[Value]) -> Value {
        let bound = bind_method(&method, receiver);
        self.call_function(bound, args)
    }

    fn eval_index(&mut self, target: &Value, index: &Value) -> Value {
        match target {
            Value::List(items) => {
                let i = index.as_number() as i64;
                if i < 0 || i as usize >= items.len() {
                    Value::Nil
                } else {
                    items[i as usize].clone()
                }
            }
            Value::Map(map) => {
                let key = index.to_string();
                map.get(&key).cloned().unwrap_or(Value::Nil)
            }
            _ => Value::Nil,
        }
    }

    fn eval_attribute(&mut self, target: &Value, name: &str) -> Value {
        match target {
            Value::Instance(inst) => {
                if let Some(v) = inst.borrow().fields.get(name) {
                    return v.clone();
                }
                let class = inst.borrow().class.clone();
                if let Some(method) = class.methods.get(name) {
                    return Value::Function(bind_method(method, target.clone()));
                }
                Value::Nil
            }
            _ => Value::Nil,
        }
    }

    fn assign_to(&mut self, target: &Expr, value: Value, env: &Rc<Environment>) {
        match target {
            Expr::Variable(name) => {
                if let Err(e) = env.assign(name, value) {
                    eprintln!("runtime error: {}", e);
                }
            }
            Expr::Attribute { target, name } => {
                let t = self.eval(target, env);
                if let Value::Instance(inst) = t {
                    inst.borrow_mut().fields.insert(name.clone(), value);
                } else {
                    eprintln!("runtime error: cannot set attribute on non-instance value");
                }
            }
            _ => eprintln!("runtime error: invalid assignment target"),
        }
    }

    fn apply_binop(&self, op: BinOp, l: &Value, r: &Value) -> Value {
        match op {
            BinOp::Add => add(l, r),
            BinOp::Sub => Value::Number(l.as_number() - r.as_number()),
            BinOp::Mul => Value::Number(l.as_number() * r.as_number()),
            BinOp::Div => {
                let rv = r.as_number();
                if rv == 0.0 {
                    eprintln!("runtime error: division by zero");
                    Value::Number(0.0)
                } else {
                    Value::Number(l.as_number() / rv)
                }
            }
            BinOp::Mod => {
                let rv = r.as_number() as i64;
                if rv == 0 {
                    eprintln!("runtime error: division by zero");
                    Value::Number(0.0)
                } else {
                    Value::Number((l.as_number() as i64 % rv) as f64)
                }
            }
            BinOp::Pow => Value::Number(l.as_number().powf(r.as_number())),
            BinOp::Lt => Value::Bool(l.as_number() < r.as_number()),
            BinOp::LtEq => Value::Bool(l.as_number() <= r.as_number()),
            BinOp::Gt => Value::Bool(l.as_number() > r.as_number()),
            BinOp::GtEq => Value::Bool(l.as_number() >= r.as_number()),
            BinOp::EqEq => Value::Bool(values_equal(l, r)),
            BinOp::NotEq => Value::Bool(!values_equal(l, r)),
            BinOp::BitAnd => Value::Number(((l.as_number() as i64) & (r.as_number() as i64)) as f64),
            BinOp::BitOr => Value::Number(((l.as_number() as i64) | (r.as_number() as i64)) as f64),
            BinOp::BitXor => Value::Number(((l.as_number() as i64) ^ (r.as_number() as i64)) as f64),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Caller for Evaluator {
    fn call(&mut self, f: &Value, args: &[Value]) -> Value {
        self.call_value(f, args)
    }
}

/// `+` is polymorphic: string concat if either side is a string, list
/// concat/append if either side is a list, numeric add otherwise.
fn add(l: &Value, r: &Value) -> Value {
    match (l, r) {
        (Value::String(_), _) | (_, Value::String(_)) => Value::String(format!("{}{}", l, r)),
        (Value::List(a), Value::List(b)) => {
            let mut out = a.clone();
            out.extend(b.clone());
            Value::List(out)
        }
        (Value::List(a), other) => {
            let mut out = a.clone();
            out.push(other.clone());
            Value::List(out)
        }
        (other, Value::List(b)) => {
            let mut out = vec![other.clone()];
            out.extend(b.clone());
            Value::List(out)
        }
        _ => Value::Number(l.as_number() + r.as_number()),
    }
}

fn bind_method(method: &Rc<FunctionData>, receiver: Value) -> Rc<FunctionData> {
    let bound_env = Environment::child(method.closure.clone());
    bound_env.define("self", receiver, false);
    Rc::new(FunctionData {
        name: method.name.clone(),
        params: method.params.clone(),
        body: method.body.clone(),
        closure: bound_env,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_src(src: &str) -> Value {
        let program = crate::parser::parse(src).unwrap();
        Evaluator::new().run(&program)
    }

    #[test]
    fn arithmetic_precedence() {
        assert!(matches!(run_src("1 + 2 * 3"), Value::Number(n) if n == 7.0));
    }

    #[test]
    fn recursive_fibonacci() {
        let src = "fn fib(n) if n < 2 return n end return fib(n-1) + fib(n-2) end fib(10)";
        assert!(matches!(run_src(src), Value::Number(n) if n == 55.0));
    }

    #[test]
    fn closure_capture_counts_up() {
        let src = "fn make() let c = 0 return fn() => c = c + 1 end let counter = make() counter() counter() counter()";
        assert!(matches!(run_src(src), Value::Number(n) if n == 3.0));
    }

    #[test]
    fn const_reassignment_is_rejected_and_value_unchanged() {
        let src = "const x = 1 x = 2 x";
        assert!(matches!(run_src(src), Value::Number(n) if n == 1.0));
    }

    #[test]
    fn class_with_init_and_method() {
        let src = "class C fn __init__(x) self.x = x end fn inc() self.x += 1 return self.x end end let c = new C(10) c.inc() c.inc()";
        assert!(matches!(run_src(src), Value::Number(n) if n == 12.0));
    }

    #[test]
    fn method_self_binding_matches_direct_call() {
        let src = "class C fn __init__(x) self.x = x end fn get() return self.x end end let o = new C(5) let m = o.get m()";
        assert!(matches!(run_src(src), Value::Number(n) if n == 5.0));
    }

    #[test]
    fn list_concat_via_plus_in_loop() {
        let src = "let xs = [] for i in range(5) xs = xs + [i*i] end xs";
        assert_eq!(run_src(src).to_string(), "[0, 1, 4, 9, 16]");
    }

    #[test]
    fn reduce_with_explicit_init() {
        let src = "let xs = [1,2,3,4,5] reduce(xs, fn(a,b) => a+b, 0)";
        assert!(matches!(run_src(src), Value::Number(n) if n == 15.0));
    }

    #[test]
    fn and_or_evaluate_both_operands() {
        // side effects on both sides of `or` are observable even though the
        // left side is truthy, confirming no short-circuiting.
        let src = "let calls = 0 fn bump() calls += 1 return true end true or bump() calls";
        assert!(matches!(run_src(src), Value::Number(n) if n == 1.0));
    }

    #[test]
    fn throw_is_caught_and_finally_runs() {
        let src = "let order = [] try throw \"boom\" catch e order = order + [e] finally order = order + [\"done\"] end order";
        assert_eq!(run_src(src).to_string(), "[boom, done]");
    }

    #[test]
    fn division_by_zero_logs_and_yields_zero() {
        assert!(matches!(run_src("1 / 0"), Value::Number(n) if n == 0.0));
    }
}
