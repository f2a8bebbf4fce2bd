use std::collections::HashMap;
use std::path::PathBuf;

use crate::{
    constants::{
        END_TIMESTAMP_PARAM, END_TS_ALIAS, FIELDS_PARAM, START_TIMESTAMP_PARAM, START_TS_ALIAS,
        SYMBOLS_PARAM,
    },
    core::{
        domain::{Action, CommandSpec, QueryParameters},
        errors::DispatchError,
    },
};

/// The external build tool and binary every action is mapped onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    pub build_tool: String,
    pub binary: String,
    pub working_dir: PathBuf,
}

/// Commands issued for one action. Preparation steps run first for their side
/// effects only; `step` is the one whose result is reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub preparation: Vec<CommandSpec>,
    pub step: CommandSpec,
}

impl Plan {
    fn single(step: CommandSpec) -> Self {
        Self {
            preparation: Vec::new(),
            step,
        }
    }
}

impl Toolchain {
    pub fn plan(
        &self,
        action: Action,
        params: &HashMap<String, String>,
    ) -> Result<Plan, DispatchError> {
        let plan = match action {
            // Every build starts from a clean tree.
            Action::Compile => Plan {
                preparation: vec![self.tool_command(["clean"]).inherit_output()],
                step: self.tool_command(Vec::<String>::new()),
            },
            Action::Test => Plan::single(self.tool_command(["test"])),
            Action::Clean => Plan::single(self.tool_command(["clean"])),
            Action::Run => Plan::single(self.binary_command(Vec::<String>::new())),
            Action::Query => Plan::single(self.query(&QueryParameters::from_params(params)?)),
        };

        Ok(plan)
    }

    pub fn query(&self, query: &QueryParameters) -> CommandSpec {
        let mut args = vec![
            "query".to_string(),
            query.symbols.clone(),
            query.start_timestamp.clone(),
            query.end_timestamp.clone(),
        ];
        args.extend(query.fields.clone());
        self.binary_command(args)
    }

    fn tool_command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(self.build_tool.as_str(), args, self.working_dir.clone())
    }

    fn binary_command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new(self.binary.as_str(), args, self.working_dir.clone())
    }
}

impl QueryParameters {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, DispatchError> {
        let fields = params
            .get(FIELDS_PARAM)
            .map(|fields| fields.trim())
            .filter(|fields| !fields.is_empty())
            .map(str::to_string);

        Ok(Self {
            symbols: required(params, SYMBOLS_PARAM, None)?,
            start_timestamp: required(params, START_TIMESTAMP_PARAM, Some(START_TS_ALIAS))?,
            end_timestamp: required(params, END_TIMESTAMP_PARAM, Some(END_TS_ALIAS))?,
            fields,
        })
    }
}

fn required(
    params: &HashMap<String, String>,
    name: &str,
    alias: Option<&str>,
) -> Result<String, DispatchError> {
    params
        .get(name)
        .or_else(|| alias.and_then(|alias| params.get(alias)))
        .cloned()
        .ok_or_else(|| DispatchError::MissingParameter {
            name: name.to_string(),
        })
}
