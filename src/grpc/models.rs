tonic::include_proto!("actionrunner");
